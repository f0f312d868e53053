#![cfg(feature = "cairo-backend")]

use std::time::Instant;

use chrono::{TimeZone, Utc};
use timeline_rs::api::{TimelineEngine, TimelineEngineConfig};
use timeline_rs::core::{ManualClock, Viewport};
use timeline_rs::render::{CairoRenderer, Color};

#[test]
fn cairo_renderer_draws_every_primitive_of_the_frame() {
    let now = Utc
        .with_ymd_and_hms(2021, 6, 15, 12, 0, 0)
        .single()
        .expect("valid date");
    let mut renderer = CairoRenderer::new(800, 60).expect("cairo renderer");
    renderer
        .set_clear_color(Some(Color::rgb(1.0, 1.0, 1.0)))
        .expect("clear color");

    let config =
        TimelineEngineConfig::new(Viewport::new(800, 60)).with_initial_duration_per_px_ms(1_000);
    let mut engine =
        TimelineEngine::new(renderer, ManualClock::new(now), config).expect("engine init");
    engine.activate(Instant::now());

    let frame = engine.build_render_frame().expect("frame");
    engine.render().expect("render");

    let stats = engine.renderer().last_stats();
    assert_eq!(stats.rects_drawn, frame.rects.len());
    assert_eq!(stats.lines_drawn, frame.lines.len());
    assert_eq!(stats.texts_drawn, frame.texts.len());
}

#[test]
fn cairo_renderer_rejects_empty_surface() {
    assert!(CairoRenderer::new(0, 60).is_err());
}
