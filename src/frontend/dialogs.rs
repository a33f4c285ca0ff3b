use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlIFrameElement, KeyboardEvent};

use super::dom;
use crate::diagnostics::{log_event, LogLevel};
use crate::notify::{ModalBus, ModalEvent, ModalRef};

/// A dialog that already lives in the page markup and is only shown or hidden.
pub struct StaticDialog {
    root: HtmlElement,
    modal: ModalRef,
    bus: ModalBus,
    open: Cell<bool>,
    on_first_open: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl StaticDialog {
    pub fn new(root: HtmlElement, bus: ModalBus) -> Self {
        let modal = ModalRef::new(root.id());
        Self {
            root,
            modal,
            bus,
            open: Cell::new(false),
            on_first_open: RefCell::new(None),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    fn run_on_first_open(&self, callback: impl FnOnce() + 'static) {
        *self.on_first_open.borrow_mut() = Some(Box::new(callback));
    }

    pub fn open(&self) {
        if self.open.replace(true) {
            return;
        }
        dom::show_dialog(&self.root);
        dom::set_scroll_locked(true);
        dom::focus_without_scroll(&self.root);

        let first_open = self.on_first_open.borrow_mut().take();
        if let Some(callback) = first_open {
            callback();
        }

        log_event(
            LogLevel::Debug,
            "dialog_opened",
            serde_json::json!({ "modal": self.modal.id() }),
        );
        self.bus.emit(ModalEvent::Opened(self.modal.clone()));
    }

    pub fn close(&self) {
        if !self.open.replace(false) {
            return;
        }
        dom::hide_dialog(&self.root);
        dom::set_scroll_locked(false);
        self.bus.emit(ModalEvent::Closed(self.modal.clone()));
    }

    /// Backdrop clicks, the close button and Escape all close the dialog.
    pub fn bind_dismissal(self: &Rc<Self>, close_button: Option<Element>) -> Vec<EventListener> {
        let mut listeners = Vec::new();

        let dialog = self.clone();
        listeners.push(EventListener::new(&self.root, "click", move |event: &Event| {
            let on_backdrop = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlElement>().ok())
                .is_some_and(|target| target == dialog.root);
            if on_backdrop {
                dialog.close();
            }
        }));

        if let Some(button) = close_button {
            let dialog = self.clone();
            listeners.push(EventListener::new(&button, "click", move |_| dialog.close()));
        }

        if let Some(document) = dom::document() {
            let dialog = self.clone();
            listeners.push(EventListener::new(&document, "keydown", move |event| {
                let is_escape = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|event| event.key() == "Escape");
                if is_escape && dialog.is_open() {
                    dialog.close();
                }
            }));
        }

        listeners
    }

    /// Click and Enter/Space key-up on any trigger open the dialog.
    pub fn bind_triggers(self: &Rc<Self>, triggers: Vec<Element>) -> Vec<EventListener> {
        let mut listeners = Vec::new();
        for trigger in triggers {
            let dialog = self.clone();
            listeners.push(EventListener::new(&trigger, "click", move |_| dialog.open()));

            let dialog = self.clone();
            listeners.push(EventListener::new(&trigger, "keyup", move |event| {
                let activated = event
                    .dyn_ref::<KeyboardEvent>()
                    .is_some_and(|event| dom::is_activation_key(&event.key()));
                if activated {
                    dialog.open();
                }
            }));
        }
        listeners
    }
}

pub struct DialogsGuard {
    _dialogs: Vec<Rc<StaticDialog>>,
    _listeners: Vec<EventListener>,
}

struct ContactDialog {
    id: &'static str,
    trigger_selector: &'static str,
    close_selector: &'static str,
}

const CONTACT_DIALOGS: [ContactDialog; 2] = [
    ContactDialog {
        id: "emailModal",
        trigger_selector: "[data-email-trigger]",
        close_selector: "[data-email-close]",
    },
    ContactDialog {
        id: "locationModal",
        trigger_selector: "[data-location-trigger]",
        close_selector: "[data-location-close]",
    },
];

pub fn install(bus: &ModalBus) -> DialogsGuard {
    let mut dialogs = Vec::new();
    let mut listeners = Vec::new();

    for contact in &CONTACT_DIALOGS {
        let Some(root) = dom::by_id::<HtmlElement>(contact.id) else {
            continue;
        };
        let triggers = dom::query_all(contact.trigger_selector);
        if triggers.is_empty() {
            continue;
        }

        let close_button = root.query_selector(contact.close_selector).ok().flatten();
        let map_frame = root
            .query_selector("iframe[data-map-src]")
            .ok()
            .flatten()
            .and_then(|frame| frame.dyn_into::<HtmlIFrameElement>().ok());

        let dialog = Rc::new(StaticDialog::new(root, bus.clone()));
        if let Some(frame) = map_frame {
            dialog.run_on_first_open(move || load_map(&frame));
        }

        listeners.extend(dialog.bind_triggers(triggers));
        listeners.extend(dialog.bind_dismissal(close_button));
        dialogs.push(dialog);
    }

    DialogsGuard {
        _dialogs: dialogs,
        _listeners: listeners,
    }
}

fn load_map(frame: &HtmlIFrameElement) {
    if frame.get_attribute("src").is_some_and(|src| !src.is_empty()) {
        return;
    }
    if let Some(src) = frame.get_attribute("data-map-src") {
        frame.set_src(&src);
    }
}
