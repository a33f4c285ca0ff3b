//! Deferred work behind small traits so controllers run headless in tests.
//!
//! Each scheduler owns at most one pending callback. The callback target is
//! fixed when the scheduler is built; the controller only asks for or cancels
//! the next tick.

pub trait FrameScheduler {
    /// Requests a callback on the next animation frame, replacing any pending one.
    fn request_frame(&mut self);
    fn cancel_frame(&mut self);
}

pub trait HoldTimer {
    fn start(&mut self, delay_ms: u32);
    fn cancel(&mut self);
}

#[cfg(test)]
pub(crate) mod manual {
    use super::{FrameScheduler, HoldTimer};

    #[derive(Default)]
    pub struct ManualFrames {
        pub pending: bool,
        pub requested: usize,
        pub cancelled: usize,
    }

    impl FrameScheduler for ManualFrames {
        fn request_frame(&mut self) {
            self.pending = true;
            self.requested += 1;
        }

        fn cancel_frame(&mut self) {
            if self.pending {
                self.cancelled += 1;
            }
            self.pending = false;
        }
    }

    #[derive(Default)]
    pub struct ManualTimer {
        pub armed_delay: Option<u32>,
        pub cancelled: usize,
    }

    impl HoldTimer for ManualTimer {
        fn start(&mut self, delay_ms: u32) {
            self.armed_delay = Some(delay_ms);
        }

        fn cancel(&mut self) {
            if self.armed_delay.take().is_some() {
                self.cancelled += 1;
            }
        }
    }
}
