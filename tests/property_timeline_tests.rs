use chrono::{DateTime, TimeDelta, Utc};
use proptest::prelude::*;
use timeline_rs::core::{
    DurationBounds, Period, TickGenerator, TimeScale, TimeWindow, TransitionController, Viewport,
};

const MIN_DPP_MS: i64 = 250;
const MAX_DPP_MS: i64 = 3 * 24 * 60 * 60 * 1_000;

fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).expect("timestamp in range")
}

fn bounds() -> DurationBounds {
    DurationBounds::new(
        TimeDelta::milliseconds(MIN_DPP_MS),
        TimeDelta::milliseconds(MAX_DPP_MS),
    )
    .expect("valid bounds")
}

proptest! {
    #[test]
    fn pixel_time_round_trip_property(
        focus_seconds in 0i64..4_000_000_000,
        dpp_ms in MIN_DPP_MS..MAX_DPP_MS,
        pixel in -2_000.0f64..2_000.0
    ) {
        let window = TimeWindow::new(timestamp(focus_seconds), TimeDelta::milliseconds(dpp_ms));
        let scale = TimeScale::new(window).expect("scale");

        let recovered = scale.time_to_pixel(scale.pixel_to_time(pixel));
        prop_assert!((recovered - pixel).abs() <= 1e-3);
    }

    #[test]
    fn ticks_are_ordered_spaced_and_lead_with_the_sentinel(
        focus_seconds in 0i64..4_000_000_000,
        dpp_ms in MIN_DPP_MS..MAX_DPP_MS,
        width in 100u32..2_000
    ) {
        let viewport = Viewport::new(width, 60);
        let window = TimeWindow::new(timestamp(focus_seconds), TimeDelta::milliseconds(dpp_ms));
        let scale = TimeScale::new(window).expect("scale");
        let generator = TickGenerator::new(70.0);

        for period in Period::ALL {
            let ticks = generator.ticks_for_period(period, scale, viewport);
            let Some(first) = ticks.first() else {
                continue;
            };
            prop_assert!(first.is_behind_visible_range);
            prop_assert_eq!(first.position, -viewport.half_width());
            prop_assert!(first.timestamp <= scale.visible_range(viewport).0);

            for pair in ticks.windows(2) {
                prop_assert!(pair[0].timestamp < pair[1].timestamp);
                prop_assert!(pair[1].position - pair[0].position >= 70.0);
                prop_assert!(!pair[1].is_behind_visible_range);
            }
        }
    }

    #[test]
    fn clamping_is_idempotent_and_never_exceeds_now(
        focus_seconds in 0i64..4_000_000_000,
        now_seconds in 0i64..4_000_000_000,
        dpp_ms in 1i64..(10 * MAX_DPP_MS)
    ) {
        let now = timestamp(now_seconds);
        let once = TimeWindow::new(timestamp(focus_seconds), TimeDelta::milliseconds(dpp_ms))
            .clamped(now, bounds());

        prop_assert_eq!(once.clamped(now, bounds()), once);
        prop_assert!(once.focused_timestamp() <= now);
        prop_assert!(once.duration_per_pixel() >= bounds().min());
        prop_assert!(once.duration_per_pixel() <= bounds().max());
    }

    #[test]
    fn pan_sequences_never_move_past_now(
        dpp_ms in MIN_DPP_MS..MAX_DPP_MS,
        deltas in proptest::collection::vec(-500.0f64..500.0, 1..32)
    ) {
        let now = timestamp(1_600_000_000);
        let mut window = TimeWindow::new(now, TimeDelta::milliseconds(dpp_ms));

        for dx in deltas {
            window = window.panned(dx, now);
            prop_assert!(window.focused_timestamp() <= now);
        }
    }

    #[test]
    fn zoom_round_trip_restores_duration(
        dpp_seconds in 1i64..3_600,
        delta_y in -300.0f64..300.0
    ) {
        let window = TimeWindow::new(timestamp(1_600_000_000), TimeDelta::seconds(dpp_seconds));

        let restored = window
            .zoomed(delta_y, 1.0015, bounds())
            .zoomed(-delta_y, 1.0015, bounds());
        let error = (restored.duration_per_pixel() - window.duration_per_pixel())
            .num_nanoseconds()
            .expect("fits");
        prop_assert!(error.abs() <= 10);
    }

    #[test]
    fn coarser_periods_shift_at_least_as_much_as_finer_ones(
        dpp_ms in MIN_DPP_MS..MAX_DPP_MS
    ) {
        let controller = TransitionController::new(415.0, 1.4);
        let dpp = TimeDelta::milliseconds(dpp_ms);

        for pair in Period::ALL.windows(2) {
            let coarse = controller.vertical_shift(pair[0], dpp);
            let fine = controller.vertical_shift(pair[1], dpp);
            prop_assert!(coarse >= fine);
        }
        for period in Period::ALL {
            let opacity = controller.opacity(period, dpp);
            prop_assert!((0.0..=1.0).contains(&opacity));
        }
    }
}
