pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
pub const FINE_POINTER_QUERY: &str = "(pointer: fine)";
pub const LANDSCAPE_WIDE_QUERY: &str = "(orientation: landscape) and (min-width: 768px)";
pub const HOVER_QUERY: &str = "(hover: hover)";
pub const LIGHT_SCHEME_QUERY: &str = "(prefers-color-scheme: light)";

/// Snapshot of the media features the ambient effects depend on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MediaGates {
    pub fine_pointer: bool,
    pub reduced_motion: bool,
    pub landscape_wide: bool,
    pub hover: bool,
}

impl MediaGates {
    pub fn parallax_enabled(self) -> bool {
        !self.reduced_motion && self.landscape_wide
    }

    pub fn cursor_enabled(self) -> bool {
        self.fine_pointer
    }

    pub fn hero_enabled(self) -> bool {
        self.fine_pointer && !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduced_motion_switches_off_motion_effects() {
        let gates = MediaGates {
            fine_pointer: true,
            reduced_motion: true,
            landscape_wide: true,
            hover: true,
        };

        assert!(!gates.parallax_enabled());
        assert!(!gates.hero_enabled());
        assert!(gates.cursor_enabled());
    }

    #[test]
    fn parallax_needs_wide_landscape() {
        let gates = MediaGates {
            landscape_wide: false,
            ..MediaGates::default()
        };
        assert!(!gates.parallax_enabled());
        assert!(MediaGates {
            landscape_wide: true,
            ..gates
        }
        .parallax_enabled());
    }

    #[test]
    fn coarse_pointer_disables_cursor_and_hero() {
        let gates = MediaGates::default();
        assert!(!gates.cursor_enabled());
        assert!(!gates.hero_enabled());
    }
}
