use chrono::{DateTime, Datelike, Utc};

use crate::core::{Period, PeriodLabelFormat};

/// Glyph prepended to the sentinel label, pointing into the past.
pub(super) const BEHIND_GLYPH: &str = "\u{2039} ";

pub(super) fn format_tick_label(
    period: Period,
    timestamp: DateTime<Utc>,
    is_behind_visible_range: bool,
) -> String {
    let label = match period.spec().label_format {
        PeriodLabelFormat::Year => timestamp.format("%Y").to_string(),
        PeriodLabelFormat::MonthName => timestamp.format("%B").to_string(),
        PeriodLabelFormat::OrdinalDay => ordinal_day(timestamp.day()),
        PeriodLabelFormat::HourMinute => timestamp.format("%H:%M").to_string(),
    };
    if is_behind_visible_range {
        format!("{BEHIND_GLYPH}{label}")
    } else {
        label
    }
}

fn ordinal_day(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

pub(super) fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    // Deterministic and backend-independent.
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            ':' | '.' => 0.34,
            ' ' => 0.33,
            'M' | 'W' | 'm' | 'w' => 0.86,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{estimate_label_text_width_px, format_tick_label};
    use crate::core::Period;

    #[test]
    fn labels_follow_period_formats() {
        let t = Utc.with_ymd_and_hms(2021, 6, 22, 9, 5, 0)
            .single()
            .expect("valid date");

        assert_eq!(format_tick_label(Period::Year, t, false), "2021");
        assert_eq!(format_tick_label(Period::Month, t, false), "June");
        assert_eq!(format_tick_label(Period::Day, t, false), "22nd");
        assert_eq!(format_tick_label(Period::Minute, t, false), "09:05");
    }

    #[test]
    fn ordinal_suffixes_cover_teens() {
        let cases = [(1, "1st"), (11, "11th"), (12, "12th"), (13, "13th"), (23, "23rd")];
        for (day, expected) in cases {
            let t = Utc.with_ymd_and_hms(2021, 1, day, 0, 0, 0)
                .single()
                .expect("valid date");
            assert_eq!(format_tick_label(Period::Day, t, false), expected);
        }
    }

    #[test]
    fn sentinel_label_carries_back_glyph() {
        let t = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0)
            .single()
            .expect("valid date");
        assert_eq!(format_tick_label(Period::Year, t, true), "\u{2039} 2021");
    }

    #[test]
    fn width_estimate_never_drops_below_font_size() {
        assert_eq!(estimate_label_text_width_px("1", 12.0), 12.0);
        assert!(estimate_label_text_width_px("September", 12.0) > 60.0);
    }
}
