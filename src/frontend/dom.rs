use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::Timeout;
use js_sys::Array;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, Document, Element, FocusOptions, HtmlElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MediaQueryList, NodeList,
};

use crate::gates::{
    MediaGates, FINE_POINTER_QUERY, HOVER_QUERY, LANDSCAPE_WIDE_QUERY, REDUCED_MOTION_QUERY,
};
use crate::schedule::{FrameScheduler, HoldTimer};

pub const FOCUSABLE_SELECTOR: &str =
    "a[href], button:not([disabled]), textarea, input, select, [tabindex]:not([tabindex=\"-1\"])";

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

pub fn by_id<T: JsCast>(id: &str) -> Option<T> {
    document()?.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok().flatten()
}

pub fn query_all(selector: &str) -> Vec<Element> {
    document()
        .and_then(|document| document.query_selector_all(selector).ok())
        .map(elements)
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn html_elements(elements: Vec<Element>) -> Vec<HtmlElement> {
    elements
        .into_iter()
        .filter_map(|element| element.dyn_into::<HtmlElement>().ok())
        .collect()
}

pub fn media_query(query: &str) -> Option<MediaQueryList> {
    window()?.match_media(query).ok().flatten()
}

pub fn matches_media(query: &str) -> bool {
    media_query(query).map(|mq| mq.matches()).unwrap_or(false)
}

pub fn current_gates() -> MediaGates {
    MediaGates {
        fine_pointer: matches_media(FINE_POINTER_QUERY),
        reduced_motion: matches_media(REDUCED_MOTION_QUERY),
        landscape_wide: matches_media(LANDSCAPE_WIDE_QUERY),
        hover: matches_media(HOVER_QUERY),
    }
}

/// Calls `handler` with the new match state whenever `query` flips.
pub fn on_media_change(query: &str, mut handler: impl FnMut(bool) + 'static) -> Option<EventListener> {
    let list = media_query(query)?;
    let target = list.clone();
    Some(EventListener::new(&list, "change", move |_| {
        handler(target.matches())
    }))
}

pub fn toggle_class(element: &Element, class: &str, force: bool) {
    let _ = element.class_list().toggle_with_force(class, force);
}

pub fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

pub fn clear_style(element: &HtmlElement, property: &str) {
    let _ = element.style().remove_property(property);
}

pub fn focus_without_scroll(element: &HtmlElement) {
    let options = FocusOptions::new();
    options.set_prevent_scroll(true);
    let _ = element.focus_with_options(&options);
}

pub fn set_scroll_locked(locked: bool) {
    if let Some(body) = body() {
        if locked {
            set_style(&body, "overflow", "hidden");
        } else {
            clear_style(&body, "overflow");
        }
    }
}

pub fn show_dialog(dialog: &HtmlElement) {
    set_style(dialog, "display", "block");
    let _ = dialog.set_attribute("aria-hidden", "false");
}

pub fn hide_dialog(dialog: &HtmlElement) {
    set_style(dialog, "display", "none");
    let _ = dialog.set_attribute("aria-hidden", "true");
}

pub fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(720.0)
}

pub fn viewport_width() -> f64 {
    window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|value| value.as_f64())
        .unwrap_or(1280.0)
}

pub fn in_viewport(element: &Element) -> bool {
    let rect = element.get_bounding_client_rect();
    rect.bottom() > 0.0 && rect.top() < viewport_height()
}

pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

/// Intersection observer that stays connected for as long as it is held.
pub struct Observer {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl Observer {
    pub fn new(
        root_margin: &str,
        threshold: f64,
        mut on_entry: impl FnMut(&IntersectionObserverEntry, &IntersectionObserver) + 'static,
    ) -> Option<Self> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        on_entry(&entry, &observer);
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        options.set_threshold(&JsValue::from_f64(threshold));

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .ok()?;

        Some(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// `requestAnimationFrame` behind [`FrameScheduler`]; dropping the pending
/// handle cancels it.
pub struct DomFrames {
    pending: Option<AnimationFrame>,
    on_frame: Rc<dyn Fn()>,
}

impl DomFrames {
    pub fn new(on_frame: impl Fn() + 'static) -> Self {
        Self {
            pending: None,
            on_frame: Rc::new(on_frame),
        }
    }
}

impl FrameScheduler for DomFrames {
    fn request_frame(&mut self) {
        let on_frame = self.on_frame.clone();
        self.pending = Some(request_animation_frame(move |_| on_frame()));
    }

    fn cancel_frame(&mut self) {
        self.pending = None;
    }
}

pub struct DomTimer {
    pending: Option<Timeout>,
    on_fire: Rc<dyn Fn()>,
}

impl DomTimer {
    pub fn new(on_fire: impl Fn() + 'static) -> Self {
        Self {
            pending: None,
            on_fire: Rc::new(on_fire),
        }
    }
}

impl HoldTimer for DomTimer {
    fn start(&mut self, delay_ms: u32) {
        let on_fire = self.on_fire.clone();
        self.pending = Some(Timeout::new(delay_ms, move || on_fire()));
    }

    fn cancel(&mut self) {
        self.pending = None;
    }
}
