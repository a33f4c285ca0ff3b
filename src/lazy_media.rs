use std::collections::HashSet;

use crate::notify::{ModalEvent, ModalRef};

/// An element carrying a deferred background resource (`data-gif`).
pub trait BackdropSurface {
    /// Attaches the resource. Returns `false` when there is nothing to load.
    fn load(&mut self) -> bool;
    fn unload(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    pub fn index(self) -> usize {
        self.0
    }

    pub fn from_index(index: usize) -> Self {
        Self(index)
    }
}

struct LazySlot<S> {
    surface: S,
    modal: Option<ModalRef>,
    loaded: bool,
}

/// Loads backdrops as they approach the viewport and drops them when they
/// leave. Backdrops inside a dialog follow the dialog's open/close events
/// instead of scrolling.
pub struct LazyMediaCoordinator<S> {
    slots: Vec<LazySlot<S>>,
    open_modals: HashSet<ModalRef>,
    eager: bool,
}

impl<S: BackdropSurface> LazyMediaCoordinator<S> {
    pub fn new(reduced_motion: bool) -> Self {
        Self {
            slots: Vec::new(),
            open_modals: HashSet::new(),
            eager: reduced_motion,
        }
    }

    pub fn is_eager(&self) -> bool {
        self.eager
    }

    pub fn register(&mut self, surface: S, modal: Option<ModalRef>) -> SlotId {
        let id = SlotId(self.slots.len());
        self.slots.push(LazySlot {
            surface,
            modal,
            loaded: false,
        });

        if self.eager {
            self.load(id);
        } else {
            self.unload(id);
        }
        id
    }

    /// Only free-standing backdrops are handed to the intersection observer.
    pub fn needs_observation(&self, id: SlotId) -> bool {
        !self.eager
            && self
                .slots
                .get(id.0)
                .is_some_and(|slot| slot.modal.is_none())
    }

    pub fn is_loaded(&self, id: SlotId) -> bool {
        self.slots.get(id.0).is_some_and(|slot| slot.loaded)
    }

    pub fn on_intersection(&mut self, id: SlotId, intersecting: bool) {
        if self.eager {
            return;
        }
        let Some(slot) = self.slots.get(id.0) else {
            return;
        };
        let free = slot.modal.is_none();
        let modal_closed = slot
            .modal
            .as_ref()
            .is_some_and(|modal| !self.open_modals.contains(modal));

        if intersecting {
            if !modal_closed {
                self.load(id);
            }
        } else if free {
            self.unload(id);
        }
    }

    pub fn on_modal_event(&mut self, event: &ModalEvent) {
        if self.eager {
            return;
        }

        let opened = matches!(event, ModalEvent::Opened(_));
        let modal = event.modal();
        if opened {
            self.open_modals.insert(modal.clone());
        } else {
            self.open_modals.remove(modal);
        }

        let members: Vec<SlotId> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.modal.as_ref() == Some(modal))
            .map(|(index, _)| SlotId(index))
            .collect();

        for id in members {
            if opened {
                self.load(id);
            } else {
                self.unload(id);
            }
        }
    }

    /// Page visibility changed. On show, each backdrop is re-evaluated with
    /// `in_viewport`, and dialog backdrops load only while their dialog is open.
    pub fn on_visibility_change(&mut self, hidden: bool, in_viewport: impl Fn(&S) -> bool) {
        if self.eager {
            return;
        }

        for index in 0..self.slots.len() {
            let id = SlotId(index);
            if hidden {
                self.unload(id);
                continue;
            }

            let slot = &self.slots[index];
            let free = slot.modal.is_none();
            let modal_open = slot
                .modal
                .as_ref()
                .map_or(true, |modal| self.open_modals.contains(modal));
            let on_screen = in_viewport(&slot.surface);

            if !modal_open {
                self.unload(id);
            } else if on_screen {
                self.load(id);
            } else if free {
                self.unload(id);
            }
        }
    }

    fn load(&mut self, id: SlotId) {
        let Some(slot) = self.slots.get_mut(id.0) else {
            return;
        };
        if slot.loaded {
            return;
        }
        slot.loaded = slot.surface.load();
    }

    fn unload(&mut self, id: SlotId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            slot.surface.unload();
            slot.loaded = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Probe {
        loads: usize,
        unloads: usize,
        attached: bool,
    }

    #[derive(Clone)]
    struct FakeBackdrop {
        probe: Rc<RefCell<Probe>>,
        on_screen: bool,
        has_source: bool,
    }

    impl FakeBackdrop {
        fn new(on_screen: bool) -> Self {
            Self {
                probe: Rc::new(RefCell::new(Probe::default())),
                on_screen,
                has_source: true,
            }
        }

        fn attached(&self) -> bool {
            self.probe.borrow().attached
        }
    }

    impl BackdropSurface for FakeBackdrop {
        fn load(&mut self) -> bool {
            if !self.has_source {
                return false;
            }
            let mut probe = self.probe.borrow_mut();
            probe.loads += 1;
            probe.attached = true;
            true
        }

        fn unload(&mut self) {
            let mut probe = self.probe.borrow_mut();
            probe.unloads += 1;
            probe.attached = false;
        }
    }

    fn modal() -> ModalRef {
        ModalRef::new("projectMediaModal")
    }

    #[test]
    fn loads_on_intersection_and_unloads_on_exit() {
        let mut lazy = LazyMediaCoordinator::new(false);
        let backdrop = FakeBackdrop::new(true);
        let id = lazy.register(backdrop.clone(), None);

        assert!(lazy.needs_observation(id));
        assert!(!lazy.is_loaded(id));

        lazy.on_intersection(id, true);
        lazy.on_intersection(id, true);
        assert!(lazy.is_loaded(id));
        assert_eq!(backdrop.probe.borrow().loads, 1);

        lazy.on_intersection(id, false);
        assert!(!lazy.is_loaded(id));
        assert!(!backdrop.attached());
    }

    #[test]
    fn modal_backdrops_ignore_scrolling() {
        let mut lazy = LazyMediaCoordinator::new(false);
        let backdrop = FakeBackdrop::new(true);
        let id = lazy.register(backdrop.clone(), Some(modal()));

        assert!(!lazy.needs_observation(id));
        lazy.on_intersection(id, true);
        assert!(!lazy.is_loaded(id));

        lazy.on_modal_event(&ModalEvent::Opened(modal()));
        assert!(lazy.is_loaded(id));

        lazy.on_intersection(id, false);
        assert!(lazy.is_loaded(id));

        lazy.on_modal_event(&ModalEvent::Closed(modal()));
        assert!(!lazy.is_loaded(id));
    }

    #[test]
    fn events_for_other_modals_leave_slot_alone() {
        let mut lazy = LazyMediaCoordinator::new(false);
        let id = lazy.register(FakeBackdrop::new(true), Some(modal()));

        lazy.on_modal_event(&ModalEvent::Opened(ModalRef::new("emailModal")));
        assert!(!lazy.is_loaded(id));
    }

    #[test]
    fn hidden_tab_unloads_everything() {
        let mut lazy = LazyMediaCoordinator::new(false);
        let on_screen = lazy.register(FakeBackdrop::new(true), None);
        let off_screen = lazy.register(FakeBackdrop::new(false), None);
        let in_modal = lazy.register(FakeBackdrop::new(true), Some(modal()));

        lazy.on_intersection(on_screen, true);
        lazy.on_intersection(off_screen, true);
        lazy.on_modal_event(&ModalEvent::Opened(modal()));

        lazy.on_visibility_change(true, |surface| surface.on_screen);

        assert!(!lazy.is_loaded(on_screen));
        assert!(!lazy.is_loaded(off_screen));
        assert!(!lazy.is_loaded(in_modal));
    }

    #[test]
    fn shown_tab_recomputes_from_viewport_and_modal_state() {
        let mut lazy = LazyMediaCoordinator::new(false);
        let on_screen = lazy.register(FakeBackdrop::new(true), None);
        let off_screen = lazy.register(FakeBackdrop::new(false), None);
        let closed_modal = lazy.register(FakeBackdrop::new(true), Some(modal()));
        let open_modal_off_screen =
            lazy.register(FakeBackdrop::new(false), Some(ModalRef::new("emailModal")));

        lazy.on_modal_event(&ModalEvent::Opened(ModalRef::new("emailModal")));
        lazy.on_visibility_change(true, |surface| surface.on_screen);
        lazy.on_visibility_change(false, |surface| surface.on_screen);

        assert!(lazy.is_loaded(on_screen));
        assert!(!lazy.is_loaded(off_screen));
        assert!(!lazy.is_loaded(closed_modal));
        assert!(!lazy.is_loaded(open_modal_off_screen));
    }

    #[test]
    fn reduced_motion_loads_eagerly_without_observation() {
        let mut lazy = LazyMediaCoordinator::new(true);
        let backdrop = FakeBackdrop::new(false);
        let id = lazy.register(backdrop.clone(), None);
        let in_modal = lazy.register(FakeBackdrop::new(false), Some(modal()));

        assert!(lazy.is_eager());
        assert!(!lazy.needs_observation(id));
        assert!(lazy.is_loaded(id));
        assert!(lazy.is_loaded(in_modal));

        lazy.on_intersection(id, false);
        lazy.on_visibility_change(true, |_| false);
        lazy.on_modal_event(&ModalEvent::Closed(modal()));
        assert!(lazy.is_loaded(id));
        assert!(lazy.is_loaded(in_modal));
        assert_eq!(backdrop.probe.borrow().unloads, 0);
    }

    #[test]
    fn missing_source_never_counts_as_loaded() {
        let mut lazy = LazyMediaCoordinator::new(false);
        let mut backdrop = FakeBackdrop::new(true);
        backdrop.has_source = false;
        let id = lazy.register(backdrop, None);

        lazy.on_intersection(id, true);
        assert!(!lazy.is_loaded(id));
    }
}
