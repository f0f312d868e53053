use std::cell::RefCell;
use std::time::Instant;

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::core::time::{duration_as_millis_f64, now_in_seconds_precision};
use crate::core::{
    Clock, DurationBounds, Period, PeriodVisibility, TickGenerator, TickList, TimeScale,
    TimeWindow, TransitionController, Viewport,
};
use crate::error::TimelineResult;
use crate::extensions::{TimelineContext, TimelineEvent, TimelineListener};
use crate::interaction::{InteractionMode, InteractionState};
use crate::render::Renderer;

use super::{NowRefreshSchedule, TimelineEngineConfig, TimelineStyle};

const MAX_DEFERRED_DISPATCH_ROUNDS: usize = 8;

#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;

/// Main orchestration facade consumed by host applications.
///
/// `TimelineEngine` owns the time window, the "now" refresh schedule, the
/// interaction state and the listener registry, and hands finished frames to
/// its renderer. All mutation happens through `&mut self` event handlers.
pub struct TimelineEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) clock: Box<dyn Clock>,
    pub(super) config: TimelineEngineConfig,
    pub(super) bounds: DurationBounds,
    pub(super) viewport: Viewport,
    pub(super) window: TimeWindow,
    pub(super) timestamp_now: DateTime<Utc>,
    pub(super) paused_at: Option<DateTime<Utc>>,
    pub(super) interaction: InteractionState,
    pub(super) now_refresh: NowRefreshSchedule,
    pub(super) style: TimelineStyle,
    pub(super) tick_generator: TickGenerator,
    pub(super) transition: TransitionController,
    pub(super) listeners: IndexMap<String, Box<dyn TimelineListener>>,
    pub(super) defer_dispatch: bool,
    pub(super) pending_events: Vec<(TimelineEvent, TimelineContext)>,
    // Ids unregistered while listeners are detached for deferred dispatch.
    pub(super) detached_removals: Option<Vec<String>>,
}

impl<R: Renderer> TimelineEngine<R> {
    /// Creates an inactive engine focused on the current instant.
    pub fn new(
        renderer: R,
        clock: impl Clock + 'static,
        config: TimelineEngineConfig,
    ) -> TimelineResult<Self> {
        let config = config.validate()?;
        let bounds = config.duration_bounds()?;
        let clock: Box<dyn Clock> = Box::new(clock);
        let timestamp_now = now_in_seconds_precision(clock.as_ref());
        let window = TimeWindow::new(timestamp_now, config.initial_duration_per_px()?)
            .clamped(timestamp_now, bounds);

        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            focused = %timestamp_now,
            "timeline engine created"
        );

        Ok(Self {
            renderer,
            clock,
            config,
            bounds,
            viewport: config.viewport,
            window,
            timestamp_now,
            paused_at: None,
            interaction: InteractionState::default(),
            now_refresh: NowRefreshSchedule::new(config.now_refresh_interval()),
            style: TimelineStyle::default(),
            tick_generator: TickGenerator::new(config.min_tick_spacing_px),
            transition: TransitionController::new(
                config.max_tick_spacing_px,
                config.fade_out_factor,
            ),
            listeners: IndexMap::new(),
            defer_dispatch: false,
            pending_events: Vec::new(),
            detached_removals: None,
        })
    }

    /// Starts the now-refresh schedule and attaches gesture handling.
    pub fn activate(&mut self, at: Instant) {
        self.refresh_now();
        self.now_refresh.activate(at);
        self.interaction.attach_gestures();
        debug!(focused = %self.window.focused_timestamp(), "timeline activated");
    }

    /// Stops the now-refresh schedule and detaches gesture handling.
    pub fn deactivate(&mut self) {
        self.now_refresh.deactivate();
        self.interaction.detach_gestures();
        debug!("timeline deactivated");
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.interaction.gestures_attached()
    }

    /// Refreshes "now" when the schedule is due. Returns `true` if it did.
    pub fn poll_now_refresh(&mut self, at: Instant) -> bool {
        if !self.now_refresh.poll(at) {
            return false;
        }
        self.refresh_now();
        true
    }

    /// Re-reads the clock and re-applies the future clamp.
    pub fn refresh_now(&mut self) {
        self.timestamp_now = now_in_seconds_precision(self.clock.as_ref());
        self.window = self.window.clamped(self.timestamp_now, self.bounds);
        trace!(now = %self.timestamp_now, "timestamp now refreshed");
        self.emit(TimelineEvent::NowRefreshed {
            timestamp_now: self.timestamp_now,
        });
    }

    #[must_use]
    pub fn now_refresh_schedule(&self) -> NowRefreshSchedule {
        self.now_refresh
    }

    /// Applies the externally paused timestamp. `Some` overrides the focus.
    pub fn set_paused_at(&mut self, paused_at: Option<DateTime<Utc>>) {
        self.paused_at = paused_at;
        if let Some(timestamp) = paused_at {
            self.window = self.window.jumped_to(timestamp, self.timestamp_now);
            debug!(
                focused = %self.window.focused_timestamp(),
                "focus overridden by paused timestamp"
            );
        }
    }

    #[must_use]
    pub fn paused_at(&self) -> Option<DateTime<Utc>> {
        self.paused_at
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            trace!(width = viewport.width, height = viewport.height, "viewport resized");
        }
        self.viewport = viewport;
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn config(&self) -> TimelineEngineConfig {
        self.config
    }

    #[must_use]
    pub fn style(&self) -> TimelineStyle {
        self.style
    }

    pub fn set_style(&mut self, style: TimelineStyle) {
        self.style = style;
    }

    #[must_use]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    #[must_use]
    pub fn focused_timestamp(&self) -> DateTime<Utc> {
        self.window.focused_timestamp()
    }

    #[must_use]
    pub fn duration_per_pixel(&self) -> TimeDelta {
        self.window.duration_per_pixel()
    }

    #[must_use]
    pub fn timestamp_now(&self) -> DateTime<Utc> {
        self.timestamp_now
    }

    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction.mode()
    }

    pub fn time_scale(&self) -> TimelineResult<TimeScale> {
        TimeScale::new(self.window)
    }

    pub fn ticks_for_period(&self, period: Period) -> TimelineResult<TickList> {
        Ok(self
            .tick_generator
            .ticks_for_period(period, self.time_scale()?, self.viewport))
    }

    #[must_use]
    pub fn period_visibility(&self, period: Period) -> PeriodVisibility {
        self.transition
            .visibility(period, self.window.duration_per_pixel())
    }

    /// Registers a listener, replacing (and returning) one with the same id.
    pub fn register_listener(
        &mut self,
        listener: Box<dyn TimelineListener>,
    ) -> Option<Box<dyn TimelineListener>> {
        let id = listener.id().to_owned();
        let replaced = self.listeners.insert(id.clone(), listener);
        if replaced.is_some() {
            warn!(listener = %id, "replacing timeline listener with duplicate id");
        }
        replaced
    }

    pub fn unregister_listener(&mut self, id: &str) -> Option<Box<dyn TimelineListener>> {
        if let Some(removals) = self.detached_removals.as_mut() {
            removals.push(id.to_owned());
        }
        self.listeners.shift_remove(id)
    }

    #[must_use]
    pub fn listener_ids(&self) -> Vec<&str> {
        self.listeners.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn context(&self) -> TimelineContext {
        TimelineContext {
            viewport: self.viewport,
            focused_timestamp: self.window.focused_timestamp(),
            duration_per_pixel_ms: duration_as_millis_f64(self.window.duration_per_pixel()),
            timestamp_now: self.timestamp_now,
            paused_at: self.paused_at,
            interaction_mode: self.interaction.mode(),
        }
    }

    /// Queues events instead of delivering them from inside the handler.
    ///
    /// Hosts that share the engine as `Rc<RefCell<_>>` enable this and call
    /// [`TimelineEngine::dispatch_deferred_events`] once their borrow ends,
    /// so listeners may borrow the engine themselves.
    pub fn set_deferred_dispatch(&mut self, deferred: bool) {
        self.defer_dispatch = deferred;
    }

    #[must_use]
    pub fn is_dispatch_deferred(&self) -> bool {
        self.defer_dispatch
    }

    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.pending_events.len()
    }

    /// Delivers queued events with the engine unborrowed and returns how many
    /// were delivered.
    ///
    /// Listeners are detached from the engine while they run. Events they
    /// trigger are delivered in follow-up rounds. Registrations and removals
    /// they make are applied once the round ends.
    pub fn dispatch_deferred_events(engine: &RefCell<Self>) -> usize {
        let mut delivered = 0;
        for _ in 0..MAX_DEFERRED_DISPATCH_ROUNDS {
            let (events, mut listeners) = {
                let mut engine = engine.borrow_mut();
                if engine.pending_events.is_empty() {
                    return delivered;
                }
                engine.detached_removals = Some(Vec::new());
                (
                    std::mem::take(&mut engine.pending_events),
                    std::mem::take(&mut engine.listeners),
                )
            };

            for (event, context) in &events {
                for listener in listeners.values_mut() {
                    listener.on_event(*event, *context);
                }
            }
            delivered += events.len();

            let mut engine = engine.borrow_mut();
            for id in engine.detached_removals.take().unwrap_or_default() {
                listeners.shift_remove(&id);
            }
            let registered_meanwhile = std::mem::replace(&mut engine.listeners, listeners);
            engine.listeners.extend(registered_meanwhile);
        }

        let dropped = {
            let mut engine = engine.borrow_mut();
            let dropped = engine.pending_events.len();
            engine.pending_events.clear();
            dropped
        };
        if dropped > 0 {
            warn!(dropped, "listeners kept emitting events; dropping the rest");
        }
        delivered
    }

    pub(super) fn emit(&mut self, event: TimelineEvent) {
        let context = self.context();
        if self.defer_dispatch {
            self.pending_events.push((event, context));
            return;
        }
        for listener in self.listeners.values_mut() {
            listener.on_event(event, context);
        }
    }

    /// Builds the current frame and hands it to the renderer.
    ///
    /// Does nothing until the viewport has a non-zero size.
    pub fn render(&mut self) -> TimelineResult<()> {
        if !self.viewport.is_valid() {
            trace!("skipping render for empty viewport");
            return Ok(());
        }
        let frame = self.build_render_frame()?;
        self.renderer.render(&frame)
    }

    /// Renders the frame into an external cairo context, typically from a GTK
    /// draw callback.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> TimelineResult<()>
    where
        R: CairoContextRenderer,
    {
        if !self.viewport.is_valid() {
            return Ok(());
        }
        let frame = self.build_render_frame()?;
        self.renderer.render_on_cairo_context(context, &frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
