//! Outward-facing hooks.
//!
//! Listeners observe engine events through a read-only context and never
//! mutate engine internals directly.

pub mod listeners;

pub use listeners::{TimelineCallbacks, TimelineContext, TimelineEvent, TimelineListener};
