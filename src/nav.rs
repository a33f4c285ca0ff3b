/// Collapsible navigation menu for narrow viewports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavMenu {
    expanded: bool,
    breakpoint_px: u32,
}

impl NavMenu {
    pub fn new(breakpoint_px: u32) -> Self {
        Self {
            expanded: false,
            breakpoint_px,
        }
    }

    pub fn expanded(&self) -> bool {
        self.expanded
    }

    /// Flips the menu, or forces it to `force` when given. Returns the new state.
    pub fn toggle(&mut self, force: Option<bool>) -> bool {
        self.expanded = force.unwrap_or(!self.expanded);
        self.expanded
    }

    /// Returns `true` when the menu was open and is now collapsed.
    pub fn collapse(&mut self) -> bool {
        if !self.expanded {
            return false;
        }
        self.expanded = false;
        true
    }

    /// Escape collapses an open menu; the caller moves focus back to the toggle
    /// when this returns `true`.
    pub fn on_escape(&mut self) -> bool {
        self.collapse()
    }

    pub fn on_resize(&mut self, viewport_width: f64) -> bool {
        if viewport_width > f64::from(self.breakpoint_px) {
            self.collapse()
        } else {
            false
        }
    }
}

/// Which in-page links should carry `active` once `section_id` is in view.
/// External links are left alone (`None`).
pub fn active_link_states<'a>(
    section_id: &str,
    hrefs: impl IntoIterator<Item = Option<&'a str>>,
) -> Vec<Option<bool>> {
    let target = format!("#{section_id}");
    hrefs
        .into_iter()
        .map(|href| match href {
            Some(href) if href == target => Some(true),
            Some(href) if href.starts_with('#') => Some(false),
            _ => None,
        })
        .collect()
}

/// Target element id for a smooth-scrolling in-page link.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_or_forces() {
        let mut menu = NavMenu::new(768);
        assert!(menu.toggle(None));
        assert!(!menu.toggle(None));
        assert!(menu.toggle(Some(true)));
        assert!(menu.toggle(Some(true)));
        assert!(menu.expanded());
    }

    #[test]
    fn escape_only_reports_when_open() {
        let mut menu = NavMenu::new(768);
        assert!(!menu.on_escape());
        menu.toggle(Some(true));
        assert!(menu.on_escape());
        assert!(!menu.expanded());
    }

    #[test]
    fn wide_resize_collapses() {
        let mut menu = NavMenu::new(768);
        menu.toggle(Some(true));

        assert!(!menu.on_resize(768.0));
        assert!(menu.expanded());
        assert!(menu.on_resize(1024.0));
        assert!(!menu.expanded());
    }

    #[test]
    fn active_link_marks_only_matching_anchor() {
        let states = active_link_states(
            "portafolio",
            [Some("#inicio"), Some("#portafolio"), Some("pages/contacto.html"), None],
        );
        assert_eq!(states, vec![Some(false), Some(true), None, None]);
    }

    #[test]
    fn anchor_target_requires_id() {
        assert_eq!(anchor_target("#servicios"), Some("servicios"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("pages/a.html"), None);
    }
}
