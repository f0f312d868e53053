use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use tracing::{debug, trace};

use crate::core::time::duration_as_millis_f64;
use crate::error::{TimelineError, TimelineResult};
use crate::extensions::TimelineEvent;
use crate::interaction::{GestureEvent, PanMove, Wheel};
use crate::render::Renderer;

use super::TimelineEngine;

impl<R: Renderer> TimelineEngine<R> {
    /// Dispatches one typed gesture event.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> TimelineResult<()> {
        match event {
            GestureEvent::PanStart => self.pan_start(),
            GestureEvent::PanMove(pan) => self.pan_move(pan)?,
            GestureEvent::PanEnd => self.pan_end(),
            GestureEvent::Wheel(wheel) => self.zoom(wheel)?,
        }
        Ok(())
    }

    pub fn pan_start(&mut self) {
        if !self.interaction.gestures_attached() {
            return;
        }
        self.interaction.on_pan_start();
        trace!(focused = %self.window.focused_timestamp(), "pan started");
        self.emit(TimelineEvent::PanStarted);
    }

    /// Moves the focus against the drag direction. Ignored unless panning.
    pub fn pan_move(&mut self, pan: PanMove) -> TimelineResult<()> {
        if !pan.dx.is_finite() {
            return Err(TimelineError::InvalidInput(
                "pan delta must be finite".to_owned(),
            ));
        }
        if !self.interaction.gestures_attached() || !self.interaction.is_panning() {
            return Ok(());
        }

        self.window = self.window.panned(pan.dx, self.timestamp_now);
        let timestamp = self.window.focused_timestamp();
        trace!(dx = pan.dx, focused = %timestamp, "pan updated");
        self.emit(TimelineEvent::PanUpdated { timestamp });
        Ok(())
    }

    pub fn pan_end(&mut self) {
        if !self.interaction.is_panning() {
            return;
        }
        self.interaction.on_pan_end();
        let timestamp = self.window.focused_timestamp();
        debug!(focused = %timestamp, "pan ended");
        self.emit(TimelineEvent::PanEnded { timestamp });
    }

    /// Scales duration-per-pixel by `zoom_sensitivity ^ delta_y`, clamped.
    pub fn zoom(&mut self, wheel: Wheel) -> TimelineResult<()> {
        if !wheel.delta_y.is_finite() {
            return Err(TimelineError::InvalidInput(
                "wheel delta must be finite".to_owned(),
            ));
        }
        if !self.interaction.gestures_attached() || wheel.delta_y == 0.0 {
            return Ok(());
        }

        let previous = self.window.duration_per_pixel();
        self.window = self
            .window
            .zoomed(wheel.delta_y, self.config.zoom_sensitivity, self.bounds);
        let current = self.window.duration_per_pixel();
        if current != previous {
            let duration_per_pixel_ms = duration_as_millis_f64(current);
            trace!(delta_y = wheel.delta_y, duration_per_pixel_ms, "zoomed");
            self.emit(TimelineEvent::ZoomChanged {
                duration_per_pixel_ms,
            });
        }
        Ok(())
    }

    /// Focuses `timestamp` (clamped to now) and notifies listeners.
    pub fn jump_to(&mut self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
        self.window = self.window.jumped_to(timestamp, self.timestamp_now);
        let timestamp = self.window.focused_timestamp();
        debug!(focused = %timestamp, "instant jump");
        self.emit(TimelineEvent::InstantJump { timestamp });
        timestamp
    }

    /// Jumps by `pixels` worth of time at the current zoom level.
    pub fn jump_relative_pixels(&mut self, pixels: f64) -> TimelineResult<DateTime<Utc>> {
        if !pixels.is_finite() {
            return Err(TimelineError::InvalidInput(
                "jump distance must be finite".to_owned(),
            ));
        }
        let target = self
            .window
            .shifted_by_pixels(pixels, DateTime::<Utc>::MAX_UTC)
            .focused_timestamp();
        Ok(self.jump_to(target))
    }

    pub fn jump_forward(&mut self) -> DateTime<Utc> {
        let pixels = self.jump_distance_px();
        self.jump_relative_pixels(pixels)
            .unwrap_or_else(|_| self.window.focused_timestamp())
    }

    pub fn jump_backward(&mut self) -> DateTime<Utc> {
        let pixels = -self.jump_distance_px();
        self.jump_relative_pixels(pixels)
            .unwrap_or_else(|_| self.window.focused_timestamp())
    }

    /// Handles a click in screen coordinates.
    ///
    /// Jumps to the tick whose label is under the pointer and returns its
    /// timestamp. Clicks on disabled ticks (in the future, or on a row that is
    /// mostly faded out) are swallowed.
    pub fn click_at(&mut self, x: f64, y: f64) -> TimelineResult<Option<DateTime<Utc>>> {
        if !x.is_finite() || !y.is_finite() {
            return Err(TimelineError::InvalidInput(
                "click position must be finite".to_owned(),
            ));
        }

        let layouts = self.tick_label_layouts()?;
        let Some(hit) = layouts
            .iter()
            .filter(|layout| layout.contains(x, y))
            .min_by_key(|layout| OrderedFloat((layout.center_x() - x).abs()))
        else {
            return Ok(None);
        };

        if hit.is_disabled {
            trace!(
                period = ?hit.period,
                timestamp = %hit.tick.timestamp,
                "click on disabled tick ignored"
            );
            return Ok(None);
        }
        Ok(Some(self.jump_to(hit.tick.timestamp)))
    }

    fn jump_distance_px(&self) -> f64 {
        f64::from(self.viewport.width) * self.config.jump_viewport_fraction
    }
}
