pub mod period;
pub mod scale;
pub mod ticks;
pub mod time;
pub mod time_scale;
pub mod time_window;
pub mod transition;
pub mod types;

pub use period::{Period, PeriodLabelFormat, PeriodSpec, TickInterval};
pub use scale::LinearScale;
pub use ticks::{Tick, TickGenerator, TickList};
pub use time::{
    Clock, ManualClock, SystemClock, clamp_to_now, now_in_seconds_precision, scale_duration,
};
pub use time_scale::TimeScale;
pub use time_window::{DurationBounds, TimeWindow};
pub use transition::{PeriodVisibility, TransitionController};
pub use types::Viewport;
