use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

/// One pointer-drag frame: horizontal movement since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanMove {
    pub dx: f64,
}

/// One wheel/scroll event. Positive values zoom out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wheel {
    pub delta_y: f64,
}

/// Typed gesture stream consumed by the engine.
///
/// Hosts translate whatever gesture recognizer they use into these events,
/// which keeps the interaction logic testable with synthetic input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GestureEvent {
    PanStart,
    PanMove(PanMove),
    PanEnd,
    Wheel(Wheel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionState {
    mode: InteractionMode,
    gestures_attached: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            mode: InteractionMode::Idle,
            gestures_attached: false,
        }
    }
}

impl InteractionState {
    #[must_use]
    pub fn mode(self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_panning(self) -> bool {
        self.mode == InteractionMode::Panning
    }

    #[must_use]
    pub fn gestures_attached(self) -> bool {
        self.gestures_attached
    }

    pub fn attach_gestures(&mut self) {
        self.gestures_attached = true;
    }

    /// Detaching also abandons any pan in progress.
    pub fn detach_gestures(&mut self) {
        self.gestures_attached = false;
        self.mode = InteractionMode::Idle;
    }

    pub fn on_pan_start(&mut self) {
        self.mode = InteractionMode::Panning;
    }

    pub fn on_pan_end(&mut self) {
        self.mode = InteractionMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionMode, InteractionState};

    #[test]
    fn detach_resets_pan_mode() {
        let mut state = InteractionState::default();
        state.attach_gestures();
        state.on_pan_start();
        assert!(state.is_panning());

        state.detach_gestures();

        assert_eq!(state.mode(), InteractionMode::Idle);
        assert!(!state.gestures_attached());
    }
}
