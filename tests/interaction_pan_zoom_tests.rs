use std::time::Instant;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use timeline_rs::api::{TimelineEngine, TimelineEngineConfig};
use timeline_rs::core::{ManualClock, Viewport};
use timeline_rs::interaction::{GestureEvent, InteractionMode, PanMove, Wheel};
use timeline_rs::render::NullRenderer;
use timeline_rs::TimelineError;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 6, 15, 12, 0, 0)
        .single()
        .expect("valid date")
}

fn build_engine(duration_per_px_ms: u64) -> TimelineEngine<NullRenderer> {
    let config = TimelineEngineConfig::new(Viewport::new(800, 60))
        .with_initial_duration_per_px_ms(duration_per_px_ms);
    let mut engine = TimelineEngine::new(NullRenderer::default(), ManualClock::new(now()), config)
        .expect("engine init");
    engine.activate(Instant::now());
    engine
}

#[test]
fn dragging_right_moves_focus_into_the_past() {
    let mut engine = build_engine(1_000);

    engine.pan_start();
    assert_eq!(engine.interaction_mode(), InteractionMode::Panning);
    engine.pan_move(PanMove { dx: 100.0 }).expect("pan move");
    assert_eq!(engine.focused_timestamp(), now() - TimeDelta::seconds(100));

    engine.pan_move(PanMove { dx: -40.0 }).expect("pan move");
    assert_eq!(engine.focused_timestamp(), now() - TimeDelta::seconds(60));

    engine.pan_end();
    assert_eq!(engine.interaction_mode(), InteractionMode::Idle);
}

#[test]
fn panning_into_the_future_clamps_to_now() {
    let mut engine = build_engine(1_000);

    engine.pan_start();
    engine.pan_move(PanMove { dx: -500.0 }).expect("pan move");
    engine.pan_end();

    assert_eq!(engine.focused_timestamp(), now());
}

#[test]
fn pan_moves_outside_a_pan_gesture_are_ignored() {
    let mut engine = build_engine(1_000);

    engine.pan_move(PanMove { dx: 100.0 }).expect("pan move");
    assert_eq!(engine.focused_timestamp(), now());
}

#[test]
fn non_finite_deltas_are_rejected() {
    let mut engine = build_engine(1_000);
    engine.pan_start();

    let err = engine
        .pan_move(PanMove { dx: f64::NAN })
        .expect_err("nan pan must fail");
    assert!(matches!(err, TimelineError::InvalidInput(_)));

    let err = engine
        .zoom(Wheel {
            delta_y: f64::INFINITY,
        })
        .expect_err("infinite wheel must fail");
    assert!(matches!(err, TimelineError::InvalidInput(_)));
    assert_eq!(engine.focused_timestamp(), now());
}

#[test]
fn gestures_are_ignored_until_activation() {
    let config = TimelineEngineConfig::new(Viewport::new(800, 60));
    let mut engine = TimelineEngine::new(NullRenderer::default(), ManualClock::new(now()), config)
        .expect("engine init");
    let initial_dpp = engine.duration_per_pixel();

    engine.handle_gesture(GestureEvent::PanStart).expect("pan start");
    engine
        .handle_gesture(GestureEvent::PanMove(PanMove { dx: 100.0 }))
        .expect("pan move");
    engine
        .handle_gesture(GestureEvent::Wheel(Wheel { delta_y: 200.0 }))
        .expect("wheel");

    assert_eq!(engine.interaction_mode(), InteractionMode::Idle);
    assert_eq!(engine.focused_timestamp(), now());
    assert_eq!(engine.duration_per_pixel(), initial_dpp);
}

#[test]
fn deactivation_detaches_gestures() {
    let mut engine = build_engine(1_000);
    engine.deactivate();

    engine.pan_start();
    engine.pan_move(PanMove { dx: 100.0 }).expect("pan move");
    engine.zoom(Wheel { delta_y: 100.0 }).expect("zoom");

    assert!(!engine.is_active());
    assert_eq!(engine.focused_timestamp(), now());
    assert_eq!(engine.duration_per_pixel(), TimeDelta::seconds(1));
}

#[test]
fn wheel_zoom_is_multiplicative_and_reversible() {
    let mut engine = build_engine(1_000);

    engine.zoom(Wheel { delta_y: 100.0 }).expect("zoom out");
    let zoomed_out = engine.duration_per_pixel();
    let expected_ns = (1.0e9 * 1.0015_f64.powf(100.0)).round() as i64;
    assert!((zoomed_out.num_nanoseconds().expect("fits") - expected_ns).abs() <= 1);

    engine.zoom(Wheel { delta_y: -100.0 }).expect("zoom in");
    let restored = engine.duration_per_pixel() - TimeDelta::seconds(1);
    assert!(restored.num_nanoseconds().expect("fits").abs() <= 2);
}

#[test]
fn wheel_zoom_clamps_to_configured_bounds() {
    let mut engine = build_engine(1_000);

    engine.zoom(Wheel { delta_y: 50_000.0 }).expect("zoom out");
    assert_eq!(engine.duration_per_pixel(), TimeDelta::days(3));

    engine.zoom(Wheel { delta_y: -50_000.0 }).expect("zoom in");
    assert_eq!(engine.duration_per_pixel(), TimeDelta::milliseconds(250));
}

#[test]
fn jump_to_future_timestamp_lands_on_now() {
    let mut engine = build_engine(1_000);

    let focused = engine.jump_to(now() + TimeDelta::hours(1));
    assert_eq!(focused, now());
    assert_eq!(engine.focused_timestamp(), now());
}

#[test]
fn forward_and_backward_jumps_cover_a_quarter_of_the_viewport() {
    let mut engine = build_engine(1_000);
    engine.jump_to(now() - TimeDelta::hours(1));

    let back = engine.jump_backward();
    assert_eq!(back, now() - TimeDelta::hours(1) - TimeDelta::seconds(200));

    let forward = engine.jump_forward();
    assert_eq!(forward, now() - TimeDelta::hours(1));

    engine.jump_to(now() - TimeDelta::seconds(50));
    assert_eq!(engine.jump_forward(), now());
}

#[test]
fn paused_timestamp_overrides_focus() {
    let mut engine = build_engine(1_000);

    engine.set_paused_at(Some(now() - TimeDelta::days(2)));
    assert!(engine.is_paused());
    assert_eq!(engine.focused_timestamp(), now() - TimeDelta::days(2));

    engine.set_paused_at(None);
    assert!(!engine.is_paused());
    assert_eq!(engine.focused_timestamp(), now() - TimeDelta::days(2));
}
