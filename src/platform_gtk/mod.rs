use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use gtk::glib;
use gtk::prelude::*;
use gtk4 as gtk;
use tracing::{debug, warn};

use crate::api::TimelineEngine;
use crate::core::Viewport;
use crate::interaction::{PanMove, Wheel};
use crate::render::{CairoContextRenderer, Renderer};

/// Scroll units GTK reports per wheel notch are scaled to browser-like deltas.
const WHEEL_DELTA_PER_STEP: f64 = 100.0;
/// Drags shorter than this (in px, both axes) count as clicks.
const CLICK_SLOP_PX: f64 = 3.0;

type SharedEngine<R> = Rc<RefCell<TimelineEngine<R>>>;

/// Embeds a `TimelineEngine` into a GTK `DrawingArea`.
///
/// `activate` installs the drag/scroll controllers and a GLib timeout for the
/// "now" refresh; `deactivate` (also run on drop) removes all of them.
///
/// Listener dispatch is deferred until each handler has released its borrow,
/// so listeners may use [`GtkTimelineAdapter::engine`] freely, e.g. to feed a
/// paused timestamp back through `set_paused_at`.
pub struct GtkTimelineAdapter<R: Renderer + CairoContextRenderer + 'static> {
    engine: SharedEngine<R>,
    drawing_area: gtk::DrawingArea,
    controllers: Vec<gtk::EventController>,
    now_refresh_source: Option<glib::SourceId>,
}

impl<R: Renderer + CairoContextRenderer + 'static> GtkTimelineAdapter<R> {
    #[must_use]
    pub fn new(mut engine: TimelineEngine<R>) -> Self {
        engine.set_deferred_dispatch(true);
        let engine = Rc::new(RefCell::new(engine));
        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_hexpand(true);
        drawing_area.set_content_height(64);

        let draw_engine = Rc::clone(&engine);
        drawing_area.set_draw_func(move |_area, context, width, height| {
            let mut engine = draw_engine.borrow_mut();
            let viewport = Viewport::new(
                u32::try_from(width).unwrap_or(0),
                u32::try_from(height).unwrap_or(0),
            );
            engine.set_viewport(viewport);
            if let Err(err) = engine.render_on_cairo_context(context) {
                warn!(error = %err, "timeline draw failed");
            }
        });

        Self {
            engine,
            drawing_area,
            controllers: Vec::new(),
            now_refresh_source: None,
        }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.drawing_area
    }

    #[must_use]
    pub fn engine(&self) -> SharedEngine<R> {
        Rc::clone(&self.engine)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.now_refresh_source.is_some()
    }

    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }
        self.engine.borrow_mut().activate(Instant::now());
        TimelineEngine::dispatch_deferred_events(&self.engine);

        let drag = self.build_drag_controller();
        let scroll = self.build_scroll_controller();
        self.drawing_area.add_controller(drag.clone());
        self.drawing_area.add_controller(scroll.clone());
        self.controllers.push(drag.upcast());
        self.controllers.push(scroll.upcast());

        let engine = Rc::clone(&self.engine);
        let area = self.drawing_area.clone();
        let interval = engine.borrow().config().now_refresh_interval();
        let source = glib::timeout_add_local(interval, move || {
            let refreshed = engine.borrow_mut().poll_now_refresh(Instant::now());
            if refreshed {
                TimelineEngine::dispatch_deferred_events(&engine);
                area.queue_draw();
            }
            glib::ControlFlow::Continue
        });
        self.now_refresh_source = Some(source);
        self.drawing_area.queue_draw();
        debug!("gtk timeline adapter activated");
    }

    pub fn deactivate(&mut self) {
        if let Some(source) = self.now_refresh_source.take() {
            source.remove();
        }
        for controller in self.controllers.drain(..) {
            self.drawing_area.remove_controller(&controller);
        }
        self.engine.borrow_mut().deactivate();
        TimelineEngine::dispatch_deferred_events(&self.engine);
        debug!("gtk timeline adapter deactivated");
    }

    fn build_drag_controller(&self) -> gtk::GestureDrag {
        let drag = gtk::GestureDrag::new();
        let last_offset_x = Rc::new(std::cell::Cell::new(0.0));

        {
            let engine = Rc::clone(&self.engine);
            let last_offset_x = Rc::clone(&last_offset_x);
            drag.connect_drag_begin(move |_, _, _| {
                last_offset_x.set(0.0);
                engine.borrow_mut().pan_start();
                TimelineEngine::dispatch_deferred_events(&engine);
            });
        }

        {
            let engine = Rc::clone(&self.engine);
            let area = self.drawing_area.clone();
            let last_offset_x = Rc::clone(&last_offset_x);
            drag.connect_drag_update(move |_, offset_x, _| {
                let dx = offset_x - last_offset_x.replace(offset_x);
                let moved = engine.borrow_mut().pan_move(PanMove { dx });
                if let Err(err) = moved {
                    warn!(error = %err, "dropping pan frame");
                }
                TimelineEngine::dispatch_deferred_events(&engine);
                area.queue_draw();
            });
        }

        {
            let engine = Rc::clone(&self.engine);
            let area = self.drawing_area.clone();
            drag.connect_drag_end(move |gesture, offset_x, offset_y| {
                {
                    let mut engine = engine.borrow_mut();
                    engine.pan_end();
                    let is_click =
                        offset_x.abs() < CLICK_SLOP_PX && offset_y.abs() < CLICK_SLOP_PX;
                    if let (true, Some((start_x, start_y))) = (is_click, gesture.start_point()) {
                        if let Err(err) = engine.click_at(start_x + offset_x, start_y + offset_y) {
                            warn!(error = %err, "ignoring timeline click");
                        }
                    }
                }
                TimelineEngine::dispatch_deferred_events(&engine);
                area.queue_draw();
            });
        }

        drag
    }

    fn build_scroll_controller(&self) -> gtk::EventControllerScroll {
        let scroll = gtk::EventControllerScroll::new(gtk::EventControllerScrollFlags::VERTICAL);
        let engine = Rc::clone(&self.engine);
        let area = self.drawing_area.clone();
        scroll.connect_scroll(move |_, _, delta_y| {
            let wheel = Wheel {
                delta_y: delta_y * WHEEL_DELTA_PER_STEP,
            };
            let zoomed = engine.borrow_mut().zoom(wheel);
            if let Err(err) = zoomed {
                warn!(error = %err, "dropping wheel event");
            }
            TimelineEngine::dispatch_deferred_events(&engine);
            area.queue_draw();
            glib::Propagation::Stop
        });
        scroll
    }
}

impl<R: Renderer + CairoContextRenderer + 'static> Drop for GtkTimelineAdapter<R> {
    fn drop(&mut self) {
        if self.is_active() {
            self.deactivate();
        }
    }
}
