use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use web_sys::{window, Element, HtmlButtonElement, HtmlElement, ScrollBehavior, ScrollToOptions};
use yew::prelude::*;

use super::dialogs::StaticDialog;
use super::dom;
use super::PageServices;
use crate::catalog::{resolve_detail_path, ProjectSummary, PROJECTS};
use crate::diagnostics::{log_event, LogLevel};
use crate::filters::{FilterAxis, FilterEngine, EMPTY_RESULT_MESSAGE};
use crate::notify::ModalBus;
use crate::strip::{scroll_step, StripDirection, StripEdges, SETTLE_DELAY_MS};

#[derive(Properties, PartialEq)]
pub struct IslandProps {
    pub services: PageServices,
}

fn current_pathname() -> String {
    window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default()
}

#[derive(Properties, PartialEq)]
struct ProjectCardProps {
    project: &'static ProjectSummary,
    href: AttrValue,
    #[prop_or_default]
    detailed: bool,
}

#[function_component(ProjectCard)]
fn project_card(props: &ProjectCardProps) -> Html {
    let project = props.project;
    let filters = props.detailed.then(|| project.filter_attr());

    html! {
        <article class="portfolio-card" tabindex="0" data-animate="fade-up" data-filters={filters}>
            <h3>{project.title}</h3>
            <p>{project.summary}</p>
            if props.detailed {
                <ul class="portfolio-card-highlights">
                    { for project.highlights.iter().map(|item| html! { <li>{*item}</li> }) }
                </ul>
            }
            <ul class="portfolio-card-tags">
                { for project.tags.iter().map(|tag| html! { <li>{*tag}</li> }) }
            </ul>
            <div class="portfolio-card-actions">
                <a
                    class="portfolio-card-action"
                    href={props.href.clone()}
                    aria-label={format!("Ver detalles del proyecto {}", project.title)}
                >
                    {"Ver proyecto"}
                </a>
            </div>
        </article>
    }
}

fn set_button_state(button: &HtmlButtonElement, disabled: bool) {
    button.set_disabled(disabled);
    dom::set_style(button, "opacity", if disabled { "0.5" } else { "1" });
    dom::set_style(button, "cursor", if disabled { "not-allowed" } else { "pointer" });
}

struct PreviewControls {
    _listeners: Vec<EventListener>,
    _settle: Rc<RefCell<Option<Timeout>>>,
}

impl PreviewControls {
    fn install() -> Option<Self> {
        let strip = dom::by_id::<HtmlElement>("portfolioPreview")?;
        let prev = dom::by_id::<HtmlButtonElement>("portfolioPrev");
        let next = dom::by_id::<HtmlButtonElement>("portfolioNext");

        let update: Rc<dyn Fn()> = {
            let strip = strip.clone();
            let prev = prev.clone();
            let next = next.clone();
            Rc::new(move || {
                let edges = StripEdges::measure(
                    f64::from(strip.scroll_left()),
                    f64::from(strip.scroll_width()),
                    f64::from(strip.client_width()),
                );
                if let Some(prev) = &prev {
                    set_button_state(prev, edges.at_start);
                }
                if let Some(next) = &next {
                    set_button_state(next, edges.at_end);
                }
            })
        };

        let settle = Rc::new(RefCell::new(None));
        let mut listeners = Vec::new();
        for (button, direction) in [(prev, StripDirection::Back), (next, StripDirection::Forward)] {
            let Some(button) = button else {
                continue;
            };
            let strip = strip.clone();
            let update = update.clone();
            let settle = settle.clone();
            listeners.push(EventListener::new(&button, "click", move |_| {
                let options = ScrollToOptions::new();
                options.set_left(scroll_step(f64::from(strip.client_width()), direction));
                options.set_behavior(ScrollBehavior::Smooth);
                strip.scroll_by_with_scroll_to_options(&options);

                let update = update.clone();
                *settle.borrow_mut() = Some(Timeout::new(SETTLE_DELAY_MS, move || update()));
            }));
        }

        let on_scroll = update.clone();
        listeners.push(EventListener::new(&strip, "scroll", move |_| on_scroll()));
        update();

        Some(Self {
            _listeners: listeners,
            _settle: settle,
        })
    }
}

#[function_component(PreviewStrip)]
pub fn preview_strip(props: &IslandProps) -> Html {
    let pathname = use_memo((), |_| current_pathname());

    {
        let reveal = props.services.reveal.clone();
        use_effect_with((), move |_| {
            let controls = PreviewControls::install();
            reveal.refresh();
            move || drop(controls)
        });
    }

    html! {
        <>
            { for PROJECTS.iter().map(|project| html! {
                <ProjectCard
                    key={project.id}
                    project={project}
                    href={resolve_detail_path(project.detail_path, &pathname)}
                />
            }) }
        </>
    }
}

#[derive(Clone, PartialEq)]
struct GridState(FilterEngine<'static>);

enum GridAction {
    Select(FilterAxis, &'static str),
    Apply,
    Clear,
}

impl Reducible for GridState {
    type Action = GridAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut engine = self.0.clone();
        match action {
            GridAction::Select(axis, value) => {
                if !engine.select(axis, value) {
                    return self;
                }
            }
            GridAction::Apply => {
                engine.apply();
            }
            GridAction::Clear => {
                engine.clear();
            }
        }
        Rc::new(Self(engine))
    }
}

struct FilterControls {
    _dialog: Rc<StaticDialog>,
    _listeners: Vec<EventListener>,
}

impl FilterControls {
    fn install(bus: &ModalBus, dispatcher: UseReducerDispatcher<GridState>) -> Option<Self> {
        let root = dom::by_id::<HtmlElement>("filtersModal")?;
        let dialog = Rc::new(StaticDialog::new(root, bus.clone()));
        let mut listeners = dialog.bind_dismissal(dom::by_id::<Element>("closeFilters"));

        if let Some(button) = dom::by_id::<Element>("openFilters") {
            let dialog = dialog.clone();
            listeners.push(EventListener::new(&button, "click", move |_| dialog.open()));
        }

        if let Some(button) = dom::by_id::<Element>("applyFilters") {
            let dialog = dialog.clone();
            let dispatcher = dispatcher.clone();
            listeners.push(EventListener::new(&button, "click", move |_| {
                dispatcher.dispatch(GridAction::Apply);
                dialog.close();
            }));
        }

        if let Some(button) = dom::by_id::<Element>("clearFilters") {
            listeners.push(EventListener::new(&button, "click", move |_| {
                dispatcher.dispatch(GridAction::Clear);
            }));
        }

        Some(Self {
            _dialog: dialog,
            _listeners: listeners,
        })
    }
}

/// Chip panels inside the filter dialog, emptied so the island owns them.
fn filter_panels() -> Vec<(FilterAxis, Element)> {
    dom::query_all("#filtersModal [data-filter-group]")
        .into_iter()
        .filter_map(|panel| {
            let axis = FilterAxis::from_group(&panel.get_attribute("data-filter-group")?)?;
            panel.set_inner_html("");
            Some((axis, panel))
        })
        .collect()
}

#[function_component(PortfolioGrid)]
pub fn portfolio_grid(props: &IslandProps) -> Html {
    let state = use_reducer(|| GridState(FilterEngine::new(PROJECTS)));
    let panels = use_memo((), |_| filter_panels());
    let pathname = use_memo((), |_| current_pathname());
    let engine = &state.0;

    {
        let bus = props.services.bus.clone();
        let dispatcher = state.dispatcher();
        use_effect_with((), move |_| {
            let controls = FilterControls::install(&bus, dispatcher);
            move || drop(controls)
        });
    }

    {
        let reveal = props.services.reveal.clone();
        let visible = engine.visible().len();
        let selection = engine.selection().clone();
        use_effect_with(engine.generation(), move |generation| {
            reveal.refresh();
            log_event(
                LogLevel::Debug,
                "portfolio_rendered",
                serde_json::json!({
                    "generation": generation,
                    "visible": visible,
                    "category": selection.category,
                    "focus": selection.focus,
                }),
            );
            || ()
        });
    }

    let chips = panels.iter().map(|(axis, host)| {
        let axis = *axis;
        let chips = html! {
            <>
                { for axis.options().iter().map(|option| {
                    let active = engine.is_active(axis, option.id);
                    let onclick = {
                        let state = state.clone();
                        let value = option.id;
                        Callback::from(move |_: MouseEvent| {
                            state.dispatch(GridAction::Select(axis, value));
                        })
                    };
                    html! {
                        <button
                            type="button"
                            class={classes!("filter-chip", active.then_some("active"))}
                            data-filter={option.id}
                            aria-pressed={active.to_string()}
                            onclick={onclick}
                        >
                            {option.label}
                        </button>
                    }
                }) }
            </>
        };
        yew::create_portal(chips, host.clone())
    });

    let generation = engine.generation();
    let cards = if engine.visible().is_empty() {
        html! { <p class="portfolio-empty">{EMPTY_RESULT_MESSAGE}</p> }
    } else {
        html! {
            <>
                { for engine.visible().iter().map(|project| html! {
                    <ProjectCard
                        key={format!("{generation}-{}", project.id)}
                        project={*project}
                        href={resolve_detail_path(project.detail_path, &pathname)}
                        detailed=true
                    />
                }) }
            </>
        }
    };

    html! {
        <>
            { for chips }
            { cards }
        </>
    }
}
