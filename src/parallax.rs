use crate::schedule::FrameScheduler;

pub const RESET_POSITION: &str = "center top";
const MIN_SCROLL_DELTA: f64 = 0.5;

/// Scroll-linked background offset for wide landscape viewports.
pub struct ParallaxController<F> {
    frames: F,
    speed: f64,
    last_scroll_y: f64,
    pending_scroll_y: f64,
    frame_pending: bool,
}

impl<F: FrameScheduler> ParallaxController<F> {
    pub fn new(frames: F, speed: f64) -> Self {
        Self {
            frames,
            speed,
            last_scroll_y: 0.0,
            pending_scroll_y: 0.0,
            frame_pending: false,
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.pending_scroll_y = scroll_y;
        if self.frame_pending {
            return;
        }
        self.frame_pending = true;
        self.frames.request_frame();
    }

    /// Background position to write, or `None` when the scroll barely moved.
    pub fn on_frame(&mut self) -> Option<String> {
        self.frame_pending = false;
        let scroll_y = self.pending_scroll_y;
        if (scroll_y - self.last_scroll_y).abs() < MIN_SCROLL_DELTA {
            return None;
        }

        self.last_scroll_y = scroll_y;
        Some(format!("center {}px", scroll_y * self.speed))
    }

    pub fn teardown(&mut self) -> &'static str {
        if self.frame_pending {
            self.frames.cancel_frame();
            self.frame_pending = false;
        }
        RESET_POSITION
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::manual::ManualFrames;

    #[test]
    fn offset_follows_scroll_at_speed() {
        let mut parallax = ParallaxController::new(ManualFrames::default(), 0.25);
        parallax.on_scroll(100.0);
        parallax.on_scroll(200.0);

        assert_eq!(parallax.frames.requested, 1);
        assert_eq!(parallax.on_frame().as_deref(), Some("center 50px"));
    }

    #[test]
    fn tiny_scroll_is_skipped() {
        let mut parallax = ParallaxController::new(ManualFrames::default(), 0.5);
        parallax.on_scroll(10.0);
        assert_eq!(parallax.on_frame().as_deref(), Some("center 5px"));

        parallax.on_scroll(10.25);
        assert_eq!(parallax.on_frame(), None);
    }

    #[test]
    fn teardown_cancels_pending_frame() {
        let mut parallax = ParallaxController::new(ManualFrames::default(), 0.3);
        parallax.on_scroll(50.0);

        assert_eq!(parallax.teardown(), RESET_POSITION);
        assert_eq!(parallax.frames.cancelled, 1);
        assert!(!parallax.frames.pending);

        assert_eq!(parallax.teardown(), RESET_POSITION);
        assert_eq!(parallax.frames.cancelled, 1);
    }
}
