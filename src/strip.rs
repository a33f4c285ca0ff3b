const END_SLACK_PX: f64 = 10.0;
const STEP_RATIO: f64 = 0.8;
pub const SETTLE_DELAY_MS: u32 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StripDirection {
    Back,
    Forward,
}

/// Button availability for the horizontal preview strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripEdges {
    pub at_start: bool,
    pub at_end: bool,
}

impl StripEdges {
    pub fn measure(scroll_left: f64, scroll_width: f64, client_width: f64) -> Self {
        Self {
            at_start: scroll_left <= 0.0,
            at_end: scroll_left + client_width >= scroll_width - END_SLACK_PX,
        }
    }
}

pub fn scroll_step(client_width: f64, direction: StripDirection) -> f64 {
    let step = client_width * STEP_RATIO;
    match direction {
        StripDirection::Back => -step,
        StripDirection::Forward => step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_at_both_ends() {
        assert_eq!(
            StripEdges::measure(0.0, 1_000.0, 400.0),
            StripEdges {
                at_start: true,
                at_end: false
            }
        );
        assert_eq!(
            StripEdges::measure(595.0, 1_000.0, 400.0),
            StripEdges {
                at_start: false,
                at_end: true
            }
        );
    }

    #[test]
    fn step_is_most_of_the_width() {
        assert_eq!(scroll_step(500.0, StripDirection::Forward), 400.0);
        assert_eq!(scroll_step(500.0, StripDirection::Back), -400.0);
    }
}
