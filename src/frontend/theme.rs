use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use js_sys::{Function, Reflect};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{window, Element, Storage};

use super::dom;
use crate::diagnostics::{log_event, LogLevel};
use crate::gates::{LIGHT_SCHEME_QUERY, REDUCED_MOTION_QUERY};
use crate::theme::{PreferenceStore, Theme, ThemeController, THEME_KEY};

fn local_storage() -> Option<Storage> {
    window()?.local_storage().ok().flatten()
}

pub struct LocalStore;

impl PreferenceStore for LocalStore {
    fn load(&self) -> Option<Theme> {
        let value = local_storage()?.get_item(THEME_KEY).ok().flatten()?;
        Theme::parse(&value)
    }

    fn save(&mut self, theme: Theme) {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(THEME_KEY, theme.as_str());
        }
    }
}

fn apply_theme(theme: Theme) {
    if let Some(body) = dom::body() {
        dom::toggle_class(&body, "light-theme", theme.is_light());
    }

    if let Some(toggle) = dom::by_id::<Element>("themeToggle") {
        let _ = toggle.set_attribute("aria-label", theme.toggle_label());
        let _ = toggle.set_attribute("aria-pressed", &theme.is_light().to_string());
    }

    if let Some(icon) = dom::query(".theme-icon") {
        dom::toggle_class(&icon, "is-light", theme.is_light());
    }
}

fn apply_theme_with_transition(theme: Theme) {
    if dom::matches_media(REDUCED_MOTION_QUERY) {
        apply_theme(theme);
        return;
    }

    let Some(document) = dom::document() else {
        apply_theme(theme);
        return;
    };

    let document_js: JsValue = document.into();
    let Ok(start_view_transition) =
        Reflect::get(&document_js, &JsValue::from_str("startViewTransition"))
    else {
        apply_theme(theme);
        return;
    };

    let Some(start_view_transition) = start_view_transition.dyn_ref::<Function>() else {
        apply_theme(theme);
        return;
    };

    let callback = Closure::once_into_js(move || apply_theme(theme));
    if start_view_transition.call1(&document_js, &callback).is_err() {
        apply_theme(theme);
    }
}

pub struct ThemeGuard {
    _controller: Rc<RefCell<ThemeController<LocalStore>>>,
    _listeners: Vec<EventListener>,
}

pub fn install() -> ThemeGuard {
    let controller = Rc::new(RefCell::new(ThemeController::new(
        LocalStore,
        dom::matches_media(LIGHT_SCHEME_QUERY),
    )));
    apply_theme(controller.borrow().current());

    let mut listeners = Vec::new();

    if let Some(toggle) = dom::by_id::<Element>("themeToggle") {
        let controller = controller.clone();
        listeners.push(EventListener::new(&toggle, "click", move |_| {
            let next = controller.borrow_mut().toggle();
            apply_theme_with_transition(next);
            log_event(
                LogLevel::Debug,
                "theme_toggled",
                serde_json::json!({ "theme": next.as_str() }),
            );
        }));
    }

    let system_controller = controller.clone();
    if let Some(listener) = dom::on_media_change(LIGHT_SCHEME_QUERY, move |prefers_light| {
        if let Some(theme) = system_controller.borrow_mut().on_system_change(prefers_light) {
            apply_theme(theme);
        }
    }) {
        listeners.push(listener);
    }

    ThemeGuard {
        _controller: controller,
        _listeners: listeners,
    }
}
