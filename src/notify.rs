use std::cell::RefCell;
use std::rc::Rc;

/// Identifies a dialog by its element id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModalRef(pub String);

impl ModalRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalEvent {
    Opened(ModalRef),
    Closed(ModalRef),
}

impl ModalEvent {
    pub fn modal(&self) -> &ModalRef {
        match self {
            Self::Opened(modal) | Self::Closed(modal) => modal,
        }
    }
}

pub type ModalSubscriber = Rc<dyn Fn(&ModalEvent)>;

/// Open/close notifications shared by every dialog on the page.
#[derive(Clone, Default)]
pub struct ModalBus {
    subscribers: Rc<RefCell<Vec<ModalSubscriber>>>,
}

impl ModalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, subscriber: impl Fn(&ModalEvent) + 'static) {
        self.subscribers.borrow_mut().push(Rc::new(subscriber));
    }

    pub fn emit(&self, event: ModalEvent) {
        // Snapshot so a subscriber may subscribe further listeners while handling.
        let subscribers: Vec<ModalSubscriber> = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            subscriber(&event);
        }
    }
}

impl PartialEq for ModalBus {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.subscribers, &other.subscribers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_each_event() {
        let bus = ModalBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for tag in ["lazy", "audit"] {
            let seen = seen.clone();
            bus.subscribe(move |event| {
                seen.borrow_mut().push((tag, event.clone()));
            });
        }

        bus.emit(ModalEvent::Opened(ModalRef::new("projectMediaModal")));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1.modal().id(), "projectMediaModal");
    }

    #[test]
    fn clones_share_subscribers() {
        let bus = ModalBus::new();
        let clone = bus.clone();
        let count = Rc::new(RefCell::new(0));

        let counter = count.clone();
        clone.subscribe(move |_| *counter.borrow_mut() += 1);
        bus.emit(ModalEvent::Closed(ModalRef::new("filtersModal")));

        assert_eq!(*count.borrow(), 1);
        assert!(bus == clone);
    }
}
