//! timeline-rs: adaptive multi-scale time axis.
//!
//! Pan and zoom continuously from seconds to years while hierarchical
//! year/month/day/minute ticks snap to calendar boundaries, cross-fade
//! between granularities, and never reach past "now".

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{TimelineEngine, TimelineEngineConfig};
pub use error::{TimelineError, TimelineResult};
