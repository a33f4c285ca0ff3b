use crate::schedule::{FrameScheduler, HoldTimer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    Click,
    Hold,
}

impl CursorState {
    pub fn class(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Click => Some("is-click"),
            Self::Hold => Some("is-hold"),
        }
    }
}

/// Ring-and-dot cursor that trails the pointer. Movement is coalesced into
/// one pending animation frame; pressing arms a single hold timer.
pub struct CursorController<F, T> {
    frames: F,
    timer: T,
    hold_delay_ms: u32,
    target: (f64, f64),
    frame_pending: bool,
    hold_armed: bool,
    state: CursorState,
    hidden: bool,
}

impl<F: FrameScheduler, T: HoldTimer> CursorController<F, T> {
    pub fn new(frames: F, timer: T, hold_delay_ms: u32) -> Self {
        Self {
            frames,
            timer,
            hold_delay_ms,
            target: (0.0, 0.0),
            frame_pending: false,
            hold_armed: false,
            state: CursorState::Idle,
            hidden: true,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn on_move(&mut self, x: f64, y: f64) {
        self.target = (x, y);
        self.request_update();
        self.hidden = false;
    }

    pub fn on_enter(&mut self) {
        self.hidden = false;
        self.request_update();
    }

    pub fn on_leave(&mut self) {
        self.clear_hold();
        self.hidden = true;
    }

    pub fn on_down(&mut self) {
        self.state = CursorState::Click;
        if self.hold_armed {
            self.timer.cancel();
        }
        self.timer.start(self.hold_delay_ms);
        self.hold_armed = true;
    }

    /// Pointer up and pointer cancel both end a press.
    pub fn on_release(&mut self) {
        self.clear_hold();
    }

    pub fn on_hold_elapsed(&mut self) {
        if !self.hold_armed {
            return;
        }
        self.hold_armed = false;
        self.state = CursorState::Hold;
    }

    /// Runs inside the animation frame; returns the transform to apply.
    pub fn on_frame(&mut self) -> String {
        self.frame_pending = false;
        let (x, y) = self.target;
        format!("translate3d({x}px, {y}px, 0)")
    }

    pub fn teardown(&mut self) {
        if self.frame_pending {
            self.frames.cancel_frame();
            self.frame_pending = false;
        }
        self.clear_hold();
    }

    fn request_update(&mut self) {
        if self.frame_pending {
            return;
        }
        self.frame_pending = true;
        self.frames.request_frame();
    }

    fn clear_hold(&mut self) {
        if self.hold_armed {
            self.timer.cancel();
            self.hold_armed = false;
        }
        self.state = CursorState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::manual::{ManualFrames, ManualTimer};

    fn cursor() -> CursorController<ManualFrames, ManualTimer> {
        CursorController::new(ManualFrames::default(), ManualTimer::default(), 400)
    }

    #[test]
    fn moves_coalesce_into_one_frame() {
        let mut cursor = cursor();
        cursor.on_move(10.0, 20.0);
        cursor.on_move(30.0, 40.0);
        cursor.on_move(50.0, 60.0);

        assert_eq!(cursor.frames.requested, 1);
        assert!(!cursor.hidden());
        assert_eq!(cursor.on_frame(), "translate3d(50px, 60px, 0)");

        cursor.on_move(1.5, 2.0);
        assert_eq!(cursor.frames.requested, 2);
        assert_eq!(cursor.on_frame(), "translate3d(1.5px, 2px, 0)");
    }

    #[test]
    fn hold_after_delay() {
        let mut cursor = cursor();
        cursor.on_down();
        assert_eq!(cursor.state(), CursorState::Click);
        assert_eq!(cursor.timer.armed_delay, Some(400));

        cursor.on_hold_elapsed();
        assert_eq!(cursor.state(), CursorState::Hold);

        cursor.on_release();
        assert_eq!(cursor.state(), CursorState::Idle);
        assert_eq!(cursor.timer.cancelled, 0);
    }

    #[test]
    fn early_release_never_reaches_hold() {
        let mut cursor = cursor();
        cursor.on_down();
        cursor.on_release();

        assert_eq!(cursor.state(), CursorState::Idle);
        assert_eq!(cursor.timer.cancelled, 1);
        assert_eq!(cursor.timer.armed_delay, None);

        cursor.on_hold_elapsed();
        assert_eq!(cursor.state(), CursorState::Idle);
    }

    #[test]
    fn leaving_hides_and_clears() {
        let mut cursor = cursor();
        cursor.on_move(4.0, 4.0);
        cursor.on_down();
        cursor.on_leave();

        assert!(cursor.hidden());
        assert_eq!(cursor.state(), CursorState::Idle);

        cursor.on_enter();
        assert!(!cursor.hidden());
    }

    #[test]
    fn teardown_cancels_pending_work() {
        let mut cursor = cursor();
        cursor.on_move(1.0, 1.0);
        cursor.on_down();
        cursor.teardown();

        assert_eq!(cursor.frames.cancelled, 1);
        assert_eq!(cursor.timer.cancelled, 1);
    }

    #[test]
    fn state_classes() {
        assert_eq!(CursorState::Idle.class(), None);
        assert_eq!(CursorState::Hold.class(), Some("is-hold"));
    }
}
