use approx::assert_abs_diff_eq;
use chrono::TimeDelta;
use timeline_rs::core::time::duration_as_millis_f64;
use timeline_rs::core::{Period, TransitionController};

fn controller() -> TransitionController {
    TransitionController::new(415.0, 1.4)
}

#[test]
fn every_row_is_visible_at_one_second_per_pixel() {
    let dpp = TimeDelta::seconds(1);

    assert_abs_diff_eq!(controller().vertical_shift(Period::Year, dpp), 4.0);
    assert_abs_diff_eq!(controller().vertical_shift(Period::Month, dpp), 3.0);
    assert_abs_diff_eq!(controller().vertical_shift(Period::Day, dpp), 2.0);
    assert_abs_diff_eq!(controller().vertical_shift(Period::Minute, dpp), 1.0);
    for period in Period::ALL {
        assert_abs_diff_eq!(controller().opacity(period, dpp), 1.0);
    }
}

#[test]
fn only_years_remain_at_three_days_per_pixel() {
    let dpp = TimeDelta::days(3);

    assert_abs_diff_eq!(controller().vertical_shift(Period::Year, dpp), 1.0);
    assert_abs_diff_eq!(controller().opacity(Period::Year, dpp), 1.0);
    for period in [Period::Month, Period::Day, Period::Minute] {
        assert_abs_diff_eq!(controller().opacity(period, dpp), 0.0);
    }
}

#[test]
fn fade_thresholds_follow_the_parent_base_interval() {
    let (fade_in, fade_out) = controller()
        .fade_thresholds(Period::Minute)
        .expect("minute has a parent");

    assert_abs_diff_eq!(
        duration_as_millis_f64(fade_in),
        86_400_000.0 / 415.0,
        epsilon = 1e-3
    );
    assert_abs_diff_eq!(
        duration_as_millis_f64(fade_out),
        86_400_000.0 / 415.0 * 1.4,
        epsilon = 1e-3
    );
    assert!(controller().fade_thresholds(Period::Year).is_none());
}

#[test]
fn midpoint_of_the_log_range_is_half_shifted() {
    let (fade_in, fade_out) = controller()
        .fade_thresholds(Period::Minute)
        .expect("minute has a parent");
    let midpoint_ns = (duration_as_millis_f64(fade_in) * duration_as_millis_f64(fade_out)).sqrt()
        * 1_000_000.0;
    let dpp = TimeDelta::nanoseconds(midpoint_ns.round() as i64);

    let visibility = controller().visibility(Period::Minute, dpp);
    assert_abs_diff_eq!(visibility.opacity, 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(
        controller().vertical_shift(Period::Day, dpp),
        1.5,
        epsilon = 1e-6
    );
}

#[test]
fn periods_form_a_single_chain() {
    assert_eq!(Period::Year.parent(), None);
    assert_eq!(Period::Year.child(), Some(Period::Month));
    assert_eq!(Period::Month.child(), Some(Period::Day));
    assert_eq!(Period::Day.child(), Some(Period::Minute));
    assert_eq!(Period::Minute.child(), None);
    assert_eq!(Period::Minute.parent(), Some(Period::Day));
}
