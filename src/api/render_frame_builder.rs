use crate::core::{Period, Tick};
use crate::error::TimelineResult;
use crate::render::{LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextHAlign, TextPrimitive};

use super::TimelineEngine;
use super::label_format::{estimate_label_text_width_px, format_tick_label};

const LABEL_LINE_HEIGHT_FACTOR: f64 = 1.3;

/// Screen placement of one tick label, shared by drawing and hit testing.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabelLayout {
    pub period: Period,
    pub tick: Tick,
    pub text: String,
    /// Screen x of the tick mark.
    pub tick_x: f64,
    /// Left edge of the label box.
    pub x: f64,
    /// Top edge of the label box.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub opacity: f64,
    pub is_disabled: bool,
}

impl TickLabelLayout {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

impl<R: Renderer> TimelineEngine<R> {
    /// Lays out every visible tick label, coarsest period first.
    ///
    /// Rows sit at `max_tick_rows - vertical_shift` times the row spacing, so
    /// coarser periods get pushed up as finer ones fade in. Rows with zero
    /// opacity are skipped.
    pub fn tick_label_layouts(&self) -> TimelineResult<Vec<TickLabelLayout>> {
        let mut layouts = Vec::new();
        if !self.viewport.is_valid() {
            return Ok(layouts);
        }

        let scale = self.time_scale()?;
        let half_width = self.viewport.half_width();
        let style = self.style;
        let label_height = style.label_font_size_px * LABEL_LINE_HEIGHT_FACTOR;

        for period in Period::ALL {
            let visibility = self.period_visibility(period);
            if visibility.opacity <= 0.0 {
                continue;
            }
            let row = style.max_tick_rows - visibility.vertical_shift;
            let y = style.top_padding_px + row * style.ticks_row_spacing_px;
            let row_disabled = visibility.opacity < self.config.disabled_opacity_threshold;

            let ticks = self
                .tick_generator
                .ticks_for_period(period, scale, self.viewport);
            for tick in ticks {
                let text = format_tick_label(period, tick.timestamp, tick.is_behind_visible_range);
                let tick_x = tick.position + half_width;
                let width = estimate_label_text_width_px(&text, style.label_font_size_px);
                layouts.push(TickLabelLayout {
                    period,
                    tick,
                    text,
                    tick_x,
                    x: tick_x + style.label_padding_px,
                    y,
                    width,
                    height: label_height,
                    opacity: visibility.opacity,
                    is_disabled: row_disabled || tick.timestamp > self.timestamp_now,
                });
            }
        }

        Ok(layouts)
    }

    /// Builds the backend-agnostic frame: future shadow, axis line, then one
    /// mark and label per tick.
    pub fn build_render_frame(&self) -> TimelineResult<RenderFrame> {
        let mut frame = RenderFrame::new(self.viewport);
        if !self.viewport.is_valid() {
            return Ok(frame);
        }

        let style = self.style;
        let width = f64::from(self.viewport.width);
        let height = f64::from(self.viewport.height);
        let scale = self.time_scale()?;

        let now_x = (scale.time_to_pixel(self.timestamp_now) + self.viewport.half_width()).max(0.0);
        if now_x < width {
            frame = frame.with_rect(RectPrimitive::new(
                now_x,
                0.0,
                width - now_x,
                height,
                style.future_shadow_color,
            ));
        }

        let axis_y = height - style.axis_line_width / 2.0;
        frame = frame.with_line(LinePrimitive::new(
            0.0,
            axis_y,
            width,
            axis_y,
            style.axis_line_width,
            style.axis_color,
        ));

        for layout in self.tick_label_layouts()? {
            let label_color = if layout.is_disabled {
                style.disabled_label_color
            } else {
                style.label_color
            };
            frame = frame
                .with_line(LinePrimitive::new(
                    layout.tick_x,
                    layout.y,
                    layout.tick_x,
                    layout.y + layout.height,
                    style.tick_mark_width,
                    style.tick_mark_color.faded(layout.opacity),
                ))
                .with_text(TextPrimitive::new(
                    layout.text,
                    layout.x,
                    layout.y,
                    style.label_font_size_px,
                    label_color.faded(layout.opacity),
                    TextHAlign::Left,
                ));
        }

        Ok(frame)
    }
}
