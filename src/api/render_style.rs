use crate::render::Color;

/// Visual tuning for timeline frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineStyle {
    pub label_color: Color,
    pub disabled_label_color: Color,
    pub tick_mark_color: Color,
    pub axis_color: Color,
    /// Overlay covering the part of the axis that lies in the future.
    pub future_shadow_color: Color,
    pub label_font_size_px: f64,
    pub label_padding_px: f64,
    pub ticks_row_spacing_px: f64,
    /// Row index of a fully visible finest period; coarser rows stack above.
    pub max_tick_rows: f64,
    pub top_padding_px: f64,
    pub axis_line_width: f64,
    pub tick_mark_width: f64,
}

impl Default for TimelineStyle {
    fn default() -> Self {
        Self {
            label_color: Color::rgb(0.33, 0.35, 0.41),
            disabled_label_color: Color::rgb(0.70, 0.71, 0.74),
            tick_mark_color: Color::rgb(0.80, 0.81, 0.84),
            axis_color: Color::rgb(0.87, 0.87, 0.87),
            future_shadow_color: Color::rgba(0.0, 0.0, 0.0, 0.06),
            label_font_size_px: 12.0,
            label_padding_px: 3.0,
            ticks_row_spacing_px: 16.0,
            max_tick_rows: 3.0,
            top_padding_px: 4.0,
            axis_line_width: 1.0,
            tick_mark_width: 1.0,
        }
    }
}
