use crate::error::TimelineResult;
use crate::render::{RenderFrame, Renderer};

/// Headless renderer for tests and hosts without a drawing surface.
///
/// Frames are still validated, and the last frame is kept for inspection.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_frame: Option<RenderFrame>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> TimelineResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}
