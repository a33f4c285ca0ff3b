mod ambient;
mod detail;
mod dialogs;
mod dom;
mod lazy;
mod portfolio;
mod theme;

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Element, HtmlElement};

use crate::config::UiConfig;
use crate::diagnostics::{self, log_event, LogLevel};
use crate::notify::ModalBus;
use lazy::{BackdropHandle, RevealHandle};
use portfolio::{IslandProps, PortfolioGrid, PreviewStrip};

/// Shared page services handed to every island.
#[derive(Clone)]
pub struct PageServices {
    pub bus: ModalBus,
    pub reveal: RevealHandle,
    pub backdrops: BackdropHandle,
    pub config: Rc<UiConfig>,
    pub reduced_motion: bool,
}

impl PartialEq for PageServices {
    fn eq(&self, other: &Self) -> bool {
        self.bus == other.bus
            && self.reveal == other.reveal
            && self.backdrops == other.backdrops
            && Rc::ptr_eq(&self.config, &other.config)
            && self.reduced_motion == other.reduced_motion
    }
}

thread_local! {
    static PAGE_GUARDS: RefCell<Vec<Box<dyn Any>>> = RefCell::new(Vec::new());
}

fn keep_alive(guard: impl Any) {
    PAGE_GUARDS.with(|guards| guards.borrow_mut().push(Box::new(guard)));
}

fn read_config(body: &HtmlElement) -> UiConfig {
    let dataset = body.dataset();
    UiConfig::from_lookup(|key| dataset.get(key))
}

/// Empties a static mount point so the island renders into a clean container.
fn island_root(id: &str) -> Option<Element> {
    let root = dom::by_id::<Element>(id)?;
    root.set_inner_html("");
    Some(root)
}

pub fn run() {
    let config = Rc::new(dom::body().map(|body| read_config(&body)).unwrap_or_default());
    diagnostics::set_min_level(config.log_level);

    if let Some(body) = dom::body() {
        dom::toggle_class(&body, "js-enabled", true);
    }

    let gates = dom::current_gates();
    let bus = ModalBus::new();

    keep_alive(theme::install());
    keep_alive(ambient::install(&config, gates));

    let reveal = RevealHandle::install();
    let (backdrops, visibility) = BackdropHandle::install(&config, gates.reduced_motion, &bus);
    keep_alive(visibility);
    keep_alive(dialogs::install(&bus));

    let services = PageServices {
        bus,
        reveal,
        backdrops,
        config: config.clone(),
        reduced_motion: gates.reduced_motion,
    };

    let preview_root = island_root("portfolioPreview");
    let grid_root = island_root("portfolioGrid");
    if let Some(root) = preview_root {
        keep_alive(
            yew::Renderer::<PreviewStrip>::with_root_and_props(
                root,
                IslandProps {
                    services: services.clone(),
                },
            )
            .render(),
        );
    }
    if let Some(root) = grid_root {
        keep_alive(
            yew::Renderer::<PortfolioGrid>::with_root_and_props(
                root,
                IslandProps {
                    services: services.clone(),
                },
            )
            .render(),
        );
    }

    if let Some(handle) = detail::mount(&services) {
        keep_alive(handle);
    }

    keep_alive(services);

    log_event(
        LogLevel::Info,
        "page_ready",
        serde_json::json!({
            "reduced_motion": gates.reduced_motion,
            "fine_pointer": gates.fine_pointer,
            "landscape_wide": gates.landscape_wide,
            "log_level": config.log_level.as_str(),
        }),
    );
}
