use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{
    window, Element, Event, HtmlElement, KeyboardEvent, PointerEvent, ScrollBehavior,
    ScrollIntoViewOptions, ScrollLogicalPosition, TouchEvent,
};

use super::dom::{self, DomFrames, DomTimer, Observer};
use crate::config::UiConfig;
use crate::cursor::CursorController;
use crate::diagnostics::{log_event, LogLevel};
use crate::gates::{
    MediaGates, FINE_POINTER_QUERY, HOVER_QUERY, LANDSCAPE_WIDE_QUERY, REDUCED_MOTION_QUERY,
};
use crate::hero::{
    repel_offset, sigil_transform, Throttle, DEFAULT_REPEL_RADIUS, HERO_UPDATE_INTERVAL_MS,
    RESET_TRANSFORM,
};
use crate::nav::{active_link_states, anchor_target, NavMenu};
use crate::parallax::ParallaxController;

const SECTION_ROOT_MARGIN: &str = "-45% 0px -45% 0px";
const SECTION_THRESHOLD: f64 = 0.1;

pub struct AmbientGuard {
    _listeners: Vec<EventListener>,
    _section_observer: Option<Observer>,
    _effects: Rc<RefCell<GatedEffects>>,
}

pub fn install(config: &Rc<UiConfig>, gates: MediaGates) -> AmbientGuard {
    let mut listeners = install_nav(config.nav_breakpoint_px);
    let section_observer = install_section_highlight();

    let effects = Rc::new(RefCell::new(GatedEffects {
        gates,
        config: config.clone(),
        parallax: None,
        cursor: None,
        hero: None,
    }));
    effects.borrow_mut().reconcile();

    let watched: [(&str, fn(&mut MediaGates, bool)); 4] = [
        (FINE_POINTER_QUERY, |gates, matches| gates.fine_pointer = matches),
        (REDUCED_MOTION_QUERY, |gates, matches| gates.reduced_motion = matches),
        (LANDSCAPE_WIDE_QUERY, |gates, matches| gates.landscape_wide = matches),
        (HOVER_QUERY, |gates, matches| gates.hover = matches),
    ];
    for (query, update) in watched {
        let effects = effects.clone();
        if let Some(listener) = dom::on_media_change(query, move |matches| {
            let mut effects = effects.borrow_mut();
            update(&mut effects.gates, matches);
            effects.reconcile();
        }) {
            listeners.push(listener);
        }
    }

    AmbientGuard {
        _listeners: listeners,
        _section_observer: section_observer,
        _effects: effects,
    }
}

struct NavElements {
    toggle: HtmlElement,
    menu: HtmlElement,
}

impl NavElements {
    fn render(&self, expanded: bool) {
        dom::toggle_class(&self.menu, "active", expanded);
        dom::toggle_class(&self.toggle, "active", expanded);
        let _ = self
            .toggle
            .set_attribute("aria-expanded", &expanded.to_string());
        let _ = self
            .menu
            .set_attribute("aria-hidden", &(!expanded).to_string());
        if let Some(body) = dom::body() {
            dom::toggle_class(&body, "nav-open", expanded);
        }
    }
}

fn install_nav(breakpoint_px: u32) -> Vec<EventListener> {
    let mut listeners = Vec::new();
    let links = dom::query_all(".nav-link");
    let menu_state = Rc::new(RefCell::new(NavMenu::new(breakpoint_px)));

    let elements = match (
        dom::by_id::<HtmlElement>("navToggle"),
        dom::by_id::<HtmlElement>("navMenu"),
    ) {
        (Some(toggle), Some(menu)) => Some(Rc::new(NavElements { toggle, menu })),
        _ => None,
    };

    if let Some(elements) = &elements {
        let _ = elements
            .toggle
            .set_attribute("aria-controls", &elements.menu.id());
        elements.render(false);

        let state = menu_state.clone();
        let nav = elements.clone();
        listeners.push(EventListener::new(&elements.toggle, "click", move |_| {
            let expanded = state.borrow_mut().toggle(None);
            nav.render(expanded);
        }));

        if let Some(document) = dom::document() {
            let state = menu_state.clone();
            let nav = elements.clone();
            listeners.push(EventListener::new(&document, "keydown", move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.key() != "Escape" || !state.borrow_mut().on_escape() {
                    return;
                }
                nav.render(false);
                let _ = nav.toggle.focus();
            }));
        }

        if let Some(window) = window() {
            let state = menu_state.clone();
            let nav = elements.clone();
            listeners.push(EventListener::new(&window, "resize", move |_| {
                if state.borrow_mut().on_resize(dom::viewport_width()) {
                    nav.render(false);
                }
            }));
        }
    }

    for link in links {
        let state = menu_state.clone();
        let nav = elements.clone();
        let href = link.get_attribute("href").unwrap_or_default();
        listeners.push(EventListener::new_with_options(
            &link,
            "click",
            EventListenerOptions::enable_prevent_default(),
            move |event: &Event| {
                if let Some(nav) = &nav {
                    if state.borrow_mut().collapse() {
                        nav.render(false);
                    }
                }
                scroll_to_anchor(&href, event);
            },
        ));
    }

    listeners
}

fn scroll_to_anchor(href: &str, event: &Event) {
    let Some(target) = anchor_target(href).and_then(dom::by_id::<Element>) else {
        return;
    };
    event.prevent_default();

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    options.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

fn install_section_highlight() -> Option<Observer> {
    let sections: Vec<Element> = dom::query_all(".section")
        .into_iter()
        .filter(|section| !section.id().is_empty())
        .collect();
    let links = dom::query_all(".nav-link");
    if sections.is_empty() || links.is_empty() {
        return None;
    }

    let observer = Observer::new(SECTION_ROOT_MARGIN, SECTION_THRESHOLD, move |entry, _| {
        if !entry.is_intersecting() {
            return;
        }
        let hrefs: Vec<Option<String>> = links
            .iter()
            .map(|link| link.get_attribute("href"))
            .collect();
        let states = active_link_states(
            &entry.target().id(),
            hrefs.iter().map(|href| href.as_deref()),
        );
        for (link, state) in links.iter().zip(states) {
            if let Some(active) = state {
                dom::toggle_class(link, "active", active);
            }
        }
    })?;

    for section in &sections {
        observer.observe(section);
    }
    Some(observer)
}

/// Effects that only run while their media gate holds. Guards are installed
/// and dropped as the gates change.
struct GatedEffects {
    gates: MediaGates,
    config: Rc<UiConfig>,
    parallax: Option<ParallaxGuard>,
    cursor: Option<CursorGuard>,
    hero: Option<HeroGuard>,
}

impl GatedEffects {
    fn reconcile(&mut self) {
        let gates = self.gates;

        if gates.parallax_enabled() != self.parallax.is_some() {
            self.parallax = if gates.parallax_enabled() {
                ParallaxGuard::install(self.config.parallax_speed)
            } else {
                None
            };
        }

        if gates.cursor_enabled() != self.cursor.is_some() {
            self.cursor = if gates.cursor_enabled() {
                CursorGuard::install(self.config.hold_delay_ms)
            } else {
                None
            };
        }

        if gates.hero_enabled() != self.hero.is_some() {
            self.hero = if gates.hero_enabled() {
                HeroGuard::install()
            } else {
                None
            };
        }

        log_event(
            LogLevel::Debug,
            "ambient_gates",
            serde_json::json!({
                "parallax": self.parallax.is_some(),
                "cursor": self.cursor.is_some(),
                "hero": self.hero.is_some(),
            }),
        );
    }
}

type DomParallax = ParallaxController<DomFrames>;

struct ParallaxGuard {
    controller: Rc<RefCell<DomParallax>>,
    body: HtmlElement,
    _listeners: Vec<EventListener>,
}

impl ParallaxGuard {
    fn install(speed: f64) -> Option<Self> {
        let body = dom::body()?;
        let window = window()?;

        let frame_body = body.clone();
        let controller = Rc::new_cyclic(|weak: &Weak<RefCell<DomParallax>>| {
            let weak = weak.clone();
            let frames = DomFrames::new(move || {
                let Some(controller) = weak.upgrade() else {
                    return;
                };
                let position = controller.borrow_mut().on_frame();
                if let Some(position) = position {
                    dom::set_style(&frame_body, "background-position", &position);
                }
            });
            RefCell::new(ParallaxController::new(frames, speed))
        });

        let scroll_controller = controller.clone();
        let scroll_window = window.clone();
        let listener = EventListener::new(&window, "scroll", move |_| {
            let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
            scroll_controller.borrow_mut().on_scroll(scroll_y);
        });

        Some(Self {
            controller,
            body,
            _listeners: vec![listener],
        })
    }
}

impl Drop for ParallaxGuard {
    fn drop(&mut self) {
        let reset = self.controller.borrow_mut().teardown();
        dom::set_style(&self.body, "background-position", reset);
    }
}

type DomCursor = CursorController<DomFrames, DomTimer>;

#[derive(Clone)]
struct CursorParts {
    ring: HtmlElement,
    dot: HtmlElement,
}

impl CursorParts {
    fn create() -> Option<Self> {
        let document = dom::document()?;
        let part = |modifier: &str| -> Option<HtmlElement> {
            let element = document.create_element("div").ok()?;
            element.set_class_name(&format!("custom-cursor custom-cursor--{modifier} is-hidden"));
            element.dyn_into::<HtmlElement>().ok()
        };
        Some(Self {
            ring: part("ring")?,
            dot: part("dot")?,
        })
    }

    fn paint(&self, cursor: &DomCursor) {
        let state = cursor.state().class();
        for part in [&self.ring, &self.dot] {
            dom::toggle_class(part, "is-hidden", cursor.hidden());
            for class in ["is-click", "is-hold"] {
                dom::toggle_class(part, class, state == Some(class));
            }
        }
    }

    fn move_to(&self, transform: &str) {
        dom::set_style(&self.ring, "transform", transform);
        dom::set_style(&self.dot, "transform", transform);
    }
}

struct CursorGuard {
    controller: Rc<RefCell<DomCursor>>,
    parts: CursorParts,
    body: HtmlElement,
    _listeners: Vec<EventListener>,
}

impl CursorGuard {
    fn install(hold_delay_ms: u32) -> Option<Self> {
        let body = dom::body()?;
        let window = window()?;
        let parts = CursorParts::create()?;

        dom::toggle_class(&body, "cursor-enabled", true);
        let _ = body.append_child(&parts.ring);
        let _ = body.append_child(&parts.dot);

        let controller = Rc::new_cyclic(|weak: &Weak<RefCell<DomCursor>>| {
            let frame_weak = weak.clone();
            let frame_parts = parts.clone();
            let frames = DomFrames::new(move || {
                let Some(controller) = frame_weak.upgrade() else {
                    return;
                };
                let transform = controller.borrow_mut().on_frame();
                frame_parts.move_to(&transform);
            });

            let hold_weak = weak.clone();
            let hold_parts = parts.clone();
            let timer = DomTimer::new(move || {
                let Some(controller) = hold_weak.upgrade() else {
                    return;
                };
                let mut cursor = controller.borrow_mut();
                cursor.on_hold_elapsed();
                hold_parts.paint(&cursor);
            });

            RefCell::new(CursorController::new(frames, timer, hold_delay_ms))
        });

        let mut listeners = Vec::new();
        let mut on = |event_type: &'static str, handler: fn(&mut DomCursor, &Event)| {
            let controller = controller.clone();
            let parts = parts.clone();
            listeners.push(EventListener::new(&window, event_type, move |event| {
                let mut cursor = controller.borrow_mut();
                handler(&mut *cursor, event);
                parts.paint(&cursor);
            }));
        };

        on("pointermove", |cursor, event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                cursor.on_move(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        });
        on("pointerdown", |cursor, _| cursor.on_down());
        on("pointerup", |cursor, _| cursor.on_release());
        on("pointercancel", |cursor, _| cursor.on_release());
        on("pointerleave", |cursor, _| cursor.on_leave());
        on("pointerenter", |cursor, _| cursor.on_enter());

        Some(Self {
            controller,
            parts,
            body,
            _listeners: listeners,
        })
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        self.controller.borrow_mut().teardown();
        self.parts.ring.remove();
        self.parts.dot.remove();
        dom::toggle_class(&self.body, "cursor-enabled", false);
    }
}

struct HeroStage {
    stage: HtmlElement,
    sigils: Vec<HtmlElement>,
    throttle: RefCell<Throttle>,
}

impl HeroStage {
    fn repel_from(&self, client_x: f64, client_y: f64) {
        if !self.throttle.borrow_mut().allow(js_sys::Date::now()) {
            return;
        }

        let bounds = self.stage.get_bounding_client_rect();
        let pointer = (client_x - bounds.left(), client_y - bounds.top());
        for sigil in &self.sigils {
            dom::toggle_class(sigil, "is-paused", true);
            let rect = sigil.get_bounding_client_rect();
            let center = (
                rect.left() - bounds.left() + rect.width() / 2.0,
                rect.top() - bounds.top() + rect.height() / 2.0,
            );
            let radius = sigil
                .get_attribute("data-float-depth")
                .and_then(|depth| depth.trim().parse::<f64>().ok())
                .filter(|depth| depth.is_finite() && *depth != 0.0)
                .unwrap_or(DEFAULT_REPEL_RADIUS);
            let transform = sigil_transform(repel_offset(center, pointer, radius));
            dom::set_style(sigil, "transform", &transform);
        }
    }

    fn reset(&self) {
        self.throttle.borrow_mut().reset();
        for sigil in &self.sigils {
            dom::toggle_class(sigil, "is-paused", false);
            dom::set_style(sigil, "transform", RESET_TRANSFORM);
        }
    }
}

struct HeroGuard {
    hero: Rc<HeroStage>,
    _listeners: Vec<EventListener>,
}

impl HeroGuard {
    fn install() -> Option<Self> {
        let stage = dom::query(".hero-logo-stage")?
            .dyn_into::<HtmlElement>()
            .ok()?;
        let sigils = dom::html_elements(dom::query_all(".floating-sigil"));
        if sigils.is_empty() {
            return None;
        }

        let hero = Rc::new(HeroStage {
            stage,
            sigils,
            throttle: RefCell::new(Throttle::new(HERO_UPDATE_INTERVAL_MS)),
        });
        hero.reset();

        let mut listeners = Vec::new();

        let pointer_hero = hero.clone();
        listeners.push(EventListener::new(&hero.stage, "pointermove", move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                pointer_hero.repel_from(f64::from(event.client_x()), f64::from(event.client_y()));
            }
        }));

        let touch_hero = hero.clone();
        listeners.push(EventListener::new(&hero.stage, "touchmove", move |event| {
            let touch = event
                .dyn_ref::<TouchEvent>()
                .and_then(|event| event.touches().get(0));
            if let Some(touch) = touch {
                touch_hero.repel_from(f64::from(touch.client_x()), f64::from(touch.client_y()));
            }
        }));

        for event_type in ["pointerleave", "touchend"] {
            let reset_hero = hero.clone();
            listeners.push(EventListener::new(&hero.stage, event_type, move |_| {
                reset_hero.reset();
            }));
        }

        Some(Self {
            hero,
            _listeners: listeners,
        })
    }
}

impl Drop for HeroGuard {
    fn drop(&mut self) {
        self.hero.reset();
    }
}
