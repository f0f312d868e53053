use serde::{Deserialize, Serialize};

/// Drawable surface size in pixels.
///
/// A zero-sized viewport is legal: hosts report it before the first layout
/// pass, and every consumer treats it as "nothing to draw yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Half of the width; the axis is laid out symmetrically around zero.
    #[must_use]
    pub fn half_width(self) -> f64 {
        f64::from(self.width) / 2.0
    }
}
