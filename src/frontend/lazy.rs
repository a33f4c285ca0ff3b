use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use web_sys::{Element, HtmlElement};

use super::dom::{self, Observer};
use crate::config::UiConfig;
use crate::diagnostics::{log_event, LogLevel};
use crate::lazy_media::{BackdropSurface, LazyMediaCoordinator, SlotId};
use crate::notify::{ModalBus, ModalRef};

const SLOT_ATTR: &str = "data-lazy-slot";
const REVEAL_THRESHOLD: f64 = 0.18;
const REVEAL_ROOT_MARGIN: &str = "0px 0px -10% 0px";

pub struct BackdropElement(HtmlElement);

impl BackdropSurface for BackdropElement {
    fn load(&mut self) -> bool {
        let Some(src) = self
            .0
            .get_attribute("data-gif")
            .filter(|src| !src.is_empty())
        else {
            return false;
        };

        dom::set_style(&self.0, "background-image", &format!("url({src})"));
        let _ = self.0.set_attribute("data-loaded", "true");
        true
    }

    fn unload(&mut self) {
        dom::set_style(&self.0, "background-image", "");
        let _ = self.0.set_attribute("data-loaded", "false");
    }
}

struct BackdropInner {
    coordinator: RefCell<LazyMediaCoordinator<BackdropElement>>,
    observer: RefCell<Option<Observer>>,
}

/// Shared handle to the page's deferred backgrounds. Islands rendered later
/// hand their own `[data-gif]` elements over through [`BackdropHandle::adopt`].
#[derive(Clone)]
pub struct BackdropHandle {
    inner: Rc<BackdropInner>,
}

impl PartialEq for BackdropHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl BackdropHandle {
    pub fn install(
        config: &UiConfig,
        reduced_motion: bool,
        bus: &ModalBus,
    ) -> (Self, Option<EventListener>) {
        let inner = Rc::new(BackdropInner {
            coordinator: RefCell::new(LazyMediaCoordinator::new(reduced_motion)),
            observer: RefCell::new(None),
        });

        if !reduced_motion {
            let weak = Rc::downgrade(&inner);
            let observer = Observer::new(
                &config.lazy_root_margin(),
                config.lazy_threshold,
                move |entry, _| {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    if let Some(slot) = slot_of(&entry.target()) {
                        inner
                            .coordinator
                            .borrow_mut()
                            .on_intersection(slot, entry.is_intersecting());
                    }
                },
            );
            if observer.is_none() {
                log_event(
                    LogLevel::Warn,
                    "lazy_observer_unavailable",
                    serde_json::json!({}),
                );
            }
            *inner.observer.borrow_mut() = observer;
        }

        let subscriber = Rc::downgrade(&inner);
        bus.subscribe(move |event| {
            if let Some(inner) = subscriber.upgrade() {
                inner.coordinator.borrow_mut().on_modal_event(event);
            }
        });

        let visibility = Rc::downgrade(&inner);
        let listener = dom::document().map(|document| {
            let target = document.clone();
            EventListener::new(&document, "visibilitychange", move |_| {
                let Some(inner) = visibility.upgrade() else {
                    return;
                };
                inner
                    .coordinator
                    .borrow_mut()
                    .on_visibility_change(target.hidden(), |surface| dom::in_viewport(&surface.0));
            })
        });

        let handle = Self { inner };
        for element in dom::html_elements(dom::query_all("[data-gif]")) {
            handle.adopt(element);
        }
        (handle, listener)
    }

    pub fn adopt(&self, element: HtmlElement) {
        if element.has_attribute(SLOT_ATTR) {
            return;
        }

        let modal = element
            .closest(".modal")
            .ok()
            .flatten()
            .map(|modal| ModalRef::new(modal.id()));

        let observed: Element = element.clone().into();
        let mut coordinator = self.inner.coordinator.borrow_mut();
        let slot = coordinator.register(BackdropElement(element), modal);
        let _ = observed.set_attribute(SLOT_ATTR, &slot.index().to_string());

        if coordinator.needs_observation(slot) {
            if let Some(observer) = self.inner.observer.borrow().as_ref() {
                observer.observe(&observed);
            }
        }
    }
}

fn slot_of(element: &Element) -> Option<SlotId> {
    element
        .get_attribute(SLOT_ATTR)?
        .parse::<usize>()
        .ok()
        .map(SlotId::from_index)
}

/// Adds `is-visible` to `[data-animate]` elements as they scroll into view.
#[derive(Clone)]
pub struct RevealHandle {
    observer: Rc<Option<Observer>>,
}

impl PartialEq for RevealHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.observer, &other.observer)
    }
}

impl RevealHandle {
    pub fn install() -> Self {
        let observer = Observer::new(REVEAL_ROOT_MARGIN, REVEAL_THRESHOLD, |entry, observer| {
            if entry.is_intersecting() {
                let target = entry.target();
                dom::toggle_class(&target, "is-visible", true);
                observer.unobserve(&target);
            }
        });

        let handle = Self {
            observer: Rc::new(observer),
        };
        handle.refresh();
        handle
    }

    /// Picks up elements rendered since the last scan.
    pub fn refresh(&self) {
        let Some(observer) = self.observer.as_ref() else {
            return;
        };
        for element in dom::query_all("[data-animate]:not(.is-visible)") {
            observer.observe(&element);
        }
    }
}
