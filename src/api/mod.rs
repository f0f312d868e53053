mod engine;
mod engine_config;
mod interaction_controller;
mod label_format;
mod now_refresh;
mod render_frame_builder;
mod render_style;

pub use engine::TimelineEngine;
pub use engine_config::{
    DEFAULT_DISABLED_OPACITY_THRESHOLD, DEFAULT_FADE_OUT_FACTOR,
    DEFAULT_INITIAL_DURATION_PER_PX_MS, DEFAULT_JUMP_VIEWPORT_FRACTION,
    DEFAULT_MAX_DURATION_PER_PX_MS, DEFAULT_MAX_TICK_SPACING_PX, DEFAULT_MIN_DURATION_PER_PX_MS,
    DEFAULT_MIN_TICK_SPACING_PX, DEFAULT_NOW_REFRESH_INTERVAL_MS, DEFAULT_ZOOM_SENSITIVITY,
    TimelineEngineConfig,
};
pub use now_refresh::NowRefreshSchedule;
pub use render_frame_builder::TickLabelLayout;
pub use render_style::TimelineStyle;
