pub const DEFAULT_REPEL_RADIUS: f64 = 32.0;
pub const HERO_UPDATE_INTERVAL_MS: f64 = 16.0;
pub const RESET_TRANSFORM: &str = "translate(0, 0)";

const BASE_OFFSET: f64 = 28.0;
const FORCE_OFFSET: f64 = 18.0;

/// Displacement pushing a sigil away from the pointer, in stage coordinates.
pub fn repel_offset(sigil: (f64, f64), pointer: (f64, f64), radius: f64) -> Option<(f64, f64)> {
    let dx = sigil.0 - pointer.0;
    let dy = sigil.1 - pointer.1;
    let distance = dx.hypot(dy);
    let distance = if distance == 0.0 { 1.0 } else { distance };

    if distance >= radius {
        return None;
    }

    let force = (radius - distance) / radius;
    let max_offset = BASE_OFFSET + force * FORCE_OFFSET;
    Some((dx / distance * max_offset, dy / distance * max_offset))
}

pub fn sigil_transform(offset: Option<(f64, f64)>) -> String {
    match offset {
        Some((x, y)) => format!("translate({x}px, {y}px)"),
        None => RESET_TRANSFORM.to_string(),
    }
}

/// Lets at most one update through per interval.
#[derive(Clone, Copy, Debug)]
pub struct Throttle {
    interval_ms: f64,
    last_ms: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn allow(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
