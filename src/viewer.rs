use crate::media::MediaItem;
use crate::notify::{ModalBus, ModalEvent, ModalRef};

/// The live surface a [`ModalViewer`] drives. The DOM implementation lives in
/// the frontend; tests use an in-memory recorder.
pub trait ViewerHost {
    /// Handle to something that can receive focus again later.
    type Focus;

    fn modal(&self) -> Option<ModalRef>;
    fn active_element(&self) -> Option<Self::Focus>;
    /// Swaps the stage content and highlights the matching tab.
    fn render_item(&mut self, index: usize, item: &MediaItem);
    fn set_visible(&mut self, visible: bool);
    fn set_scroll_locked(&mut self, locked: bool);
    fn focus_modal(&mut self);
    fn install_focus_trap(&mut self);
    fn remove_focus_trap(&mut self);
    /// Returns `false` when the target can no longer take focus.
    fn restore_focus(&mut self, target: &Self::Focus) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewerKey {
    Escape,
    Next,
    Previous,
}

impl ViewerKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Escape" => Some(Self::Escape),
            "ArrowDown" | "ArrowRight" => Some(Self::Next),
            "ArrowUp" | "ArrowLeft" => Some(Self::Previous),
            _ => None,
        }
    }
}

/// Position to move focus to when `Tab` is pressed inside a dialog, or `None`
/// to let the browser move focus itself.
pub fn focus_trap_target(count: usize, focused: Option<usize>, shift: bool) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let last = count - 1;
    match (shift, focused) {
        (true, Some(0)) => Some(last),
        (false, Some(position)) if position == last => Some(0),
        _ => None,
    }
}

pub struct ModalViewer<H: ViewerHost> {
    items: Vec<MediaItem>,
    active_index: usize,
    is_open: bool,
    restore_target: Option<H::Focus>,
    host: H,
    bus: ModalBus,
}

impl<H: ViewerHost> ModalViewer<H> {
    /// The stage stays empty until the first `open`.
    pub fn new(items: Vec<MediaItem>, host: H, bus: ModalBus) -> Self {
        Self {
            items,
            active_index: 0,
            is_open: false,
            restore_target: None,
            host,
            bus,
        }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Gallery cards register themselves before opening so focus returns to
    /// the card rather than whatever held focus before the click.
    pub fn remember_trigger(&mut self, trigger: H::Focus) {
        self.restore_target = Some(trigger);
    }

    pub fn open(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }
        let Some(modal) = self.host.modal() else {
            return;
        };

        if self.is_open {
            self.set_active_item(index);
            return;
        }

        self.active_index = self.clamp(index);
        if self.restore_target.is_none() {
            self.restore_target = self.host.active_element();
        }
        self.host
            .render_item(self.active_index, &self.items[self.active_index]);
        self.host.set_visible(true);
        self.host.set_scroll_locked(true);
        self.host.focus_modal();
        self.host.install_focus_trap();
        self.is_open = true;

        self.bus.emit(ModalEvent::Opened(modal));
    }

    pub fn set_active_item(&mut self, index: usize) {
        if self.items.is_empty() {
            return;
        }

        let index = self.clamp(index);
        if index == self.active_index {
            return;
        }

        self.active_index = index;
        self.host.render_item(index, &self.items[index]);
    }

    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }

        self.host.set_visible(false);
        self.host.set_scroll_locked(false);
        self.host.remove_focus_trap();
        self.is_open = false;

        if let Some(modal) = self.host.modal() {
            self.bus.emit(ModalEvent::Closed(modal));
        }

        if let Some(target) = self.restore_target.take() {
            self.host.restore_focus(&target);
        }
    }

    pub fn next(&mut self) {
        let len = self.items.len();
        if len > 0 {
            self.set_active_item((self.active_index + 1) % len);
        }
    }

    pub fn previous(&mut self) {
        let len = self.items.len();
        if len > 0 {
            self.set_active_item((self.active_index + len - 1) % len);
        }
    }

    /// Returns `true` when the key was consumed and its default should be
    /// suppressed.
    pub fn handle_key(&mut self, key: ViewerKey) -> bool {
        if !self.is_open {
            return false;
        }

        match key {
            ViewerKey::Escape => self.close(),
            ViewerKey::Next => self.next(),
            ViewerKey::Previous => self.previous(),
        }
        true
    }

    fn clamp(&self, index: usize) -> usize {
        index.min(self.items.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaKind;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingHost {
        modal_present: bool,
        focused: Option<&'static str>,
        detached: Vec<&'static str>,
        rendered: Vec<usize>,
        visible: bool,
        scroll_locked: bool,
        trap_installed: usize,
        trap_removed: usize,
        restored: Vec<&'static str>,
    }

    impl ViewerHost for RecordingHost {
        type Focus = &'static str;

        fn modal(&self) -> Option<ModalRef> {
            self.modal_present
                .then(|| ModalRef::new("projectMediaModal"))
        }

        fn active_element(&self) -> Option<&'static str> {
            self.focused
        }

        fn render_item(&mut self, index: usize, _item: &MediaItem) {
            self.rendered.push(index);
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }

        fn set_scroll_locked(&mut self, locked: bool) {
            self.scroll_locked = locked;
        }

        fn focus_modal(&mut self) {
            self.focused = Some("modal");
        }

        fn install_focus_trap(&mut self) {
            self.trap_installed += 1;
        }

        fn remove_focus_trap(&mut self) {
            self.trap_removed += 1;
        }

        fn restore_focus(&mut self, target: &&'static str) -> bool {
            if self.detached.contains(target) {
                return false;
            }
            self.focused = Some(*target);
            self.restored.push(*target);
            true
        }
    }

    fn items(count: usize) -> Vec<MediaItem> {
        (0..count)
            .map(|index| MediaItem {
                kind: MediaKind::Image,
                src: Some(format!("shots/{index}.png")),
                poster: None,
                thumbnail: None,
                title: format!("Shot {index}"),
                description: String::new(),
            })
            .collect()
    }

    fn viewer(count: usize) -> (ModalViewer<RecordingHost>, Rc<RefCell<Vec<ModalEvent>>>) {
        let bus = ModalBus::new();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let host = RecordingHost {
            modal_present: true,
            focused: Some("body-link"),
            ..RecordingHost::default()
        };
        (ModalViewer::new(items(count), host, bus), events)
    }

    #[test]
    fn open_sets_active_index_and_emits() {
        for index in 0..4 {
            let (mut viewer, events) = viewer(4);
            viewer.open(index);

            assert!(viewer.is_open());
            assert_eq!(viewer.active_index(), index);
            assert!(viewer.host().visible);
            assert!(viewer.host().scroll_locked);
            assert_eq!(viewer.host().trap_installed, 1);
            assert_eq!(
                events.borrow().as_slice(),
                &[ModalEvent::Opened(ModalRef::new("projectMediaModal"))]
            );
        }
    }

    #[test]
    fn construction_leaves_the_stage_empty() {
        let (viewer, _) = viewer(3);
        assert!(viewer.host().rendered.is_empty());
        assert_eq!(viewer.active_index(), 0);
    }

    #[test]
    fn open_renders_even_when_index_is_current() {
        let (mut viewer, _) = viewer(3);
        viewer.open(0);
        assert_eq!(viewer.host().rendered, vec![0]);

        viewer.close();
        viewer.open(0);
        assert_eq!(viewer.host().rendered, vec![0, 0]);

        viewer.close();
        viewer.open(2);
        viewer.close();
        viewer.open(2);
        assert_eq!(viewer.host().rendered, vec![0, 0, 2, 2]);
    }

    #[test]
    fn open_with_no_items_is_a_no_op() {
        let (mut viewer, events) = viewer(0);
        viewer.open(0);

        assert!(!viewer.is_open());
        assert_eq!(viewer.active_index(), 0);
        assert!(viewer.host().rendered.is_empty());
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn open_without_modal_root_is_a_no_op() {
        let bus = ModalBus::new();
        let mut viewer = ModalViewer::new(items(2), RecordingHost::default(), bus);
        viewer.open(1);

        assert!(!viewer.is_open());
        assert_eq!(viewer.active_index(), 0);
    }

    #[test]
    fn close_restores_scroll_and_focus() {
        let (mut viewer, events) = viewer(3);
        viewer.open(2);
        viewer.close();

        assert!(!viewer.is_open());
        assert!(!viewer.host().visible);
        assert!(!viewer.host().scroll_locked);
        assert_eq!(viewer.host().trap_removed, 1);
        assert_eq!(viewer.host().focused, Some("body-link"));
        assert_eq!(
            events.borrow().last(),
            Some(&ModalEvent::Closed(ModalRef::new("projectMediaModal")))
        );
    }

    #[test]
    fn close_when_closed_does_nothing() {
        let (mut viewer, events) = viewer(3);
        viewer.close();

        assert_eq!(viewer.host().trap_removed, 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn remembered_trigger_takes_precedence() {
        let (mut viewer, _) = viewer(3);
        viewer.remember_trigger("card-1");
        viewer.open(1);
        viewer.close();

        assert_eq!(viewer.host().restored, vec!["card-1"]);

        viewer.open(0);
        viewer.close();
        assert_eq!(viewer.host().restored, vec!["card-1", "card-1"]);
    }

    #[test]
    fn detached_restore_target_is_skipped() {
        let (mut viewer, _) = viewer(2);
        viewer.remember_trigger("removed-card");
        viewer.host.detached.push("removed-card");
        viewer.open(0);
        viewer.close();

        assert!(viewer.host().restored.is_empty());
        assert_eq!(viewer.host().focused, Some("modal"));
    }

    #[test]
    fn set_active_item_skips_current_index() {
        let (mut viewer, _) = viewer(3);
        viewer.open(1);
        let renders = viewer.host().rendered.len();

        viewer.set_active_item(1);
        assert_eq!(viewer.host().rendered.len(), renders);

        viewer.set_active_item(2);
        assert_eq!(viewer.active_index(), 2);
        assert_eq!(viewer.host().rendered.last(), Some(&2));
        assert_eq!(viewer.host().trap_installed, 1);
    }

    #[test]
    fn arrows_wrap_circularly() {
        let (mut viewer, _) = viewer(3);
        viewer.open(2);

        assert!(viewer.handle_key(ViewerKey::Next));
        assert_eq!(viewer.active_index(), 0);

        assert!(viewer.handle_key(ViewerKey::Previous));
        assert_eq!(viewer.active_index(), 2);
    }

    #[test]
    fn keys_are_ignored_while_closed() {
        let (mut viewer, _) = viewer(3);
        assert!(!viewer.handle_key(ViewerKey::Next));
        assert_eq!(viewer.active_index(), 0);
    }

    #[test]
    fn escape_closes() {
        let (mut viewer, _) = viewer(2);
        viewer.open(0);
        assert!(viewer.handle_key(ViewerKey::Escape));
        assert!(!viewer.is_open());
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let (mut viewer, _) = viewer(3);
        viewer.open(9);
        assert_eq!(viewer.active_index(), 2);
    }

    #[test]
    fn key_names_map_to_commands() {
        assert_eq!(ViewerKey::from_key("ArrowRight"), Some(ViewerKey::Next));
        assert_eq!(ViewerKey::from_key("ArrowUp"), Some(ViewerKey::Previous));
        assert_eq!(ViewerKey::from_key("Tab"), None);
    }

    #[test]
    fn focus_trap_cycles_at_the_edges() {
        assert_eq!(focus_trap_target(3, Some(2), false), Some(0));
        assert_eq!(focus_trap_target(3, Some(0), true), Some(2));
        assert_eq!(focus_trap_target(3, Some(1), false), None);
        assert_eq!(focus_trap_target(3, None, true), None);
        assert_eq!(focus_trap_target(0, Some(0), false), None);
    }
}
