use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Element, HtmlElement, HtmlImageElement, HtmlMediaElement};
use yew::prelude::*;
use yew::AppHandle;

use super::dom;
use super::PageServices;
use crate::diagnostics::{log_event, LogLevel};
use crate::media::{
    video_mime, Highlight, MediaItem, MediaKind, Presentation, ProjectMediaPayload,
    IMAGE_PLACEHOLDER, PAYLOAD_ELEMENT_ID, UNAVAILABLE_TITLE,
};
use crate::notify::ModalRef;
use crate::viewer::{focus_trap_target, ModalViewer, ViewerHost, ViewerKey};

const MODAL_ID: &str = "projectMediaModal";

/// Which item the stage shows, and which render pass built it. Every
/// `render_item` bumps `render`, so the keyed stage remounts even when the
/// index is unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct StageSlot {
    index: usize,
    render: u32,
}

/// Drives the yew-rendered viewer dialog. Visibility and focus are handled
/// imperatively; the stage itself re-renders from `stage`.
struct DomViewerHost {
    modal: NodeRef,
    stage: UseStateHandle<Option<StageSlot>>,
    renders: u32,
    trap: Option<EventListener>,
}

impl DomViewerHost {
    fn root(&self) -> Option<HtmlElement> {
        self.modal.cast::<HtmlElement>()
    }
}

impl ViewerHost for DomViewerHost {
    type Focus = HtmlElement;

    fn modal(&self) -> Option<ModalRef> {
        self.root().map(|root| ModalRef::new(root.id()))
    }

    fn active_element(&self) -> Option<HtmlElement> {
        dom::document()?
            .active_element()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn render_item(&mut self, index: usize, _item: &MediaItem) {
        self.renders = self.renders.wrapping_add(1);
        self.stage.set(Some(StageSlot {
            index,
            render: self.renders,
        }));
    }

    fn set_visible(&mut self, visible: bool) {
        if let Some(root) = self.root() {
            if visible {
                dom::show_dialog(&root);
            } else {
                dom::hide_dialog(&root);
            }
        }
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        dom::set_scroll_locked(locked);
    }

    fn focus_modal(&mut self) {
        if let Some(root) = self.root() {
            dom::focus_without_scroll(&root);
        }
    }

    fn install_focus_trap(&mut self) {
        let Some(root) = self.root() else {
            return;
        };
        let scope: Element = root.clone().into();
        self.trap = Some(EventListener::new_with_options(
            &root,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if event.key() != "Tab" {
                    return;
                }

                let focusables = dom::html_elements(dom::query_all_in(&scope, dom::FOCUSABLE_SELECTOR));
                let focused = dom::document()
                    .and_then(|document| document.active_element())
                    .and_then(|active| {
                        focusables
                            .iter()
                            .position(|candidate| {
                                let candidate: &Element = candidate;
                                *candidate == active
                            })
                    });

                if let Some(target) = focus_trap_target(focusables.len(), focused, event.shift_key())
                    .and_then(|index| focusables.get(index))
                {
                    event.prevent_default();
                    let _ = target.focus();
                }
            },
        ));
    }

    fn remove_focus_trap(&mut self) {
        self.trap = None;
    }

    fn restore_focus(&mut self, target: &HtmlElement) -> bool {
        if !target.is_connected() {
            return false;
        }
        dom::focus_without_scroll(target);
        true
    }
}

type DetailViewer = ModalViewer<DomViewerHost>;

async fn play(media: &HtmlMediaElement) -> bool {
    match media.play() {
        Ok(promise) => JsFuture::from(promise).await.is_ok(),
        Err(_) => false,
    }
}

/// Autoplay, retried once muted when the browser rejects it.
fn autoplay_with_muted_retry(media: HtmlMediaElement) {
    spawn_local(async move {
        if play(&media).await {
            return;
        }
        media.set_muted(true);
        if !play(&media).await {
            log_event(
                LogLevel::Debug,
                "autoplay_rejected",
                serde_json::json!({ "src": media.current_src() }),
            );
        }
    });
}

fn swap_to_placeholder() -> Callback<Event> {
    Callback::from(|event: Event| {
        if let Some(image) = event.target_dyn_into::<HtmlImageElement>() {
            if image.src() != IMAGE_PLACEHOLDER {
                image.set_src(IMAGE_PLACEHOLDER);
            }
        }
    })
}

fn unavailable(item: &MediaItem) -> Html {
    html! {
        <div class="project-media-empty">
            <strong>{UNAVAILABLE_TITLE}</strong>
            <p>{item.unavailable_message()}</p>
        </div>
    }
}

fn video_source(src: &str, onerror: Callback<Event>) -> Html {
    html! {
        <source src={src.to_string()} type={video_mime(src)} onerror={onerror} />
    }
}

#[derive(Properties, PartialEq)]
struct MediaProps {
    item: MediaItem,
    reduced_motion: bool,
}

#[function_component(StageMedia)]
fn stage_media(props: &MediaProps) -> Html {
    let failed = use_state_eq(|| false);
    let video_ref = use_node_ref();

    {
        let video_ref = video_ref.clone();
        use_effect_with((), move |_| {
            if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                autoplay_with_muted_retry(video);
            }
            || ()
        });
    }

    let item = &props.item;
    match item.presentation() {
        Presentation::Video { src } if !*failed => {
            let onerror = {
                let failed = failed.clone();
                Callback::from(move |_: Event| failed.set(true))
            };
            html! {
                <video
                    ref={video_ref}
                    class="project-media-modal__video"
                    playsinline=true
                    controls=true
                    preload={if props.reduced_motion { "metadata" } else { "auto" }}
                    poster={item.poster.clone()}
                    onerror={onerror.clone()}
                >
                    { video_source(src, onerror) }
                </video>
            }
        }
        Presentation::Image { src } => html! {
            <img
                class="project-media-modal__image"
                loading="lazy"
                decoding="async"
                src={src.to_string()}
                alt={item.title.clone()}
                onerror={swap_to_placeholder()}
            />
        },
        _ => unavailable(item),
    }
}

#[function_component(GalleryMedia)]
fn gallery_media(props: &MediaProps) -> Html {
    let failed = use_state_eq(|| false);
    let video_ref = use_node_ref();

    {
        let video_ref = video_ref.clone();
        let reduced_motion = props.reduced_motion;
        use_effect_with((), move |_| {
            if let Some(video) = video_ref.cast::<HtmlMediaElement>() {
                video.set_muted(true);
                if !reduced_motion {
                    spawn_local(async move {
                        let _ = play(&video).await;
                    });
                }
            }
            || ()
        });
    }

    let item = &props.item;
    match item.presentation() {
        Presentation::Video { src } if !*failed => {
            let onerror = {
                let failed = failed.clone();
                Callback::from(move |_: Event| failed.set(true))
            };
            html! {
                <video
                    ref={video_ref}
                    class="project-media-video"
                    playsinline=true
                    loop=true
                    muted=true
                    autoplay={!props.reduced_motion}
                    preload={if props.reduced_motion { "metadata" } else { "auto" }}
                    poster={item.poster.clone()}
                    onerror={onerror.clone()}
                >
                    { video_source(src, onerror) }
                </video>
            }
        }
        Presentation::Video { .. } => unavailable(item),
        _ if item.kind == MediaKind::Image => {
            let placeholder = item.src.as_deref().map_or(true, str::is_empty);
            html! {
                <img
                    class="project-media-image"
                    loading="lazy"
                    decoding="async"
                    src={item.image_src().to_string()}
                    alt={item.title.clone()}
                    data-placeholder={placeholder.then_some("true")}
                    onerror={swap_to_placeholder()}
                />
            }
        }
        _ => unavailable(item),
    }
}

fn open_from_card(viewer: &RefCell<DetailViewer>, event: &Event, index: usize) {
    let card = event
        .target_dyn_into::<Element>()
        .and_then(|target| target.closest(".project-media-card").ok().flatten())
        .and_then(|card| card.dyn_into::<HtmlElement>().ok());

    let Ok(mut viewer) = viewer.try_borrow_mut() else {
        return;
    };
    if let Some(card) = card {
        viewer.remember_trigger(card);
    }
    viewer.open(index);
}

fn gallery_card(viewer: &Rc<RefCell<DetailViewer>>, item: &MediaItem, index: usize, reduced_motion: bool) -> Html {
    let onclick = {
        let viewer = viewer.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            open_from_card(&viewer, &event, index);
        })
    };
    let onkeyup = {
        let viewer = viewer.clone();
        Callback::from(move |event: KeyboardEvent| {
            if dom::is_activation_key(&event.key()) {
                event.prevent_default();
                open_from_card(&viewer, &event, index);
            }
        })
    };
    let is_empty = !matches!(item.presentation(), Presentation::Video { .. })
        && item.kind != MediaKind::Image;

    html! {
        <article
            key={index.to_string()}
            class={classes!("project-media-card", is_empty.then_some("is-empty"))}
            tabindex="0"
            data-index={index.to_string()}
            data-animate="fade-up"
            onclick={onclick}
            onkeyup={onkeyup}
        >
            <div class="project-media-preview">
                <GalleryMedia item={item.clone()} reduced_motion={reduced_motion} />
            </div>
            <div class="project-media-overlay">
                <h3>{item.display_title()}</h3>
                <p>{item.description.clone()}</p>
                <span class="project-media-overlay__cta">{"Ver detalle"}</span>
            </div>
        </article>
    }
}

fn highlight_card(highlight: &Highlight) -> Html {
    html! {
        <div class="project-gallery-card" data-animate="fade-up">
            <h3 class="project-gallery-title">{highlight.title.clone()}</h3>
            <p class="project-gallery-text">{highlight.description.clone()}</p>
        </div>
    }
}

fn tab(viewer: &Rc<RefCell<DetailViewer>>, item: &MediaItem, index: usize, active: bool) -> Html {
    let select = {
        let viewer = viewer.clone();
        move || {
            if let Ok(mut viewer) = viewer.try_borrow_mut() {
                viewer.set_active_item(index);
            }
        }
    };
    let onclick = {
        let select = select.clone();
        Callback::from(move |_: MouseEvent| select())
    };
    let onkeyup = Callback::from(move |event: KeyboardEvent| {
        if dom::is_activation_key(&event.key()) {
            event.prevent_default();
            select();
        }
    });

    html! {
        <button
            key={index.to_string()}
            type="button"
            class={classes!("project-media-modal__tab", active.then_some("is-active"))}
            data-index={index.to_string()}
            aria-selected={active.to_string()}
            onclick={onclick}
            onkeyup={onkeyup}
        >
            if let Some(thumbnail) = item.thumbnail.clone() {
                <img
                    class="project-media-modal__thumb"
                    loading="lazy"
                    decoding="async"
                    src={thumbnail}
                    alt={item.title.clone()}
                    onerror={swap_to_placeholder()}
                />
            }
            <span class="project-media-modal__tab-label">{item.tab_label(index)}</span>
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProjectDetailProps {
    pub services: PageServices,
    pub payload: Rc<ProjectMediaPayload>,
    #[prop_or_default]
    pub gallery: Option<Element>,
    #[prop_or_default]
    pub highlights: Option<Element>,
}

#[function_component(ProjectDetail)]
pub fn project_detail(props: &ProjectDetailProps) -> Html {
    let services = &props.services;
    let items = &props.payload.media;
    let reduced_motion = services.reduced_motion;

    let modal_ref = use_node_ref();
    let stage = use_state_eq(|| None::<StageSlot>);
    let viewer = use_memo((), |_| {
        let host = DomViewerHost {
            modal: modal_ref.clone(),
            stage: stage.clone(),
            renders: 0,
            trap: None,
        };
        RefCell::new(ModalViewer::new(
            items.clone(),
            host,
            services.bus.clone(),
        ))
    });

    {
        let viewer = viewer.clone();
        let modal_ref = modal_ref.clone();
        let backdrops = services.backdrops.clone();
        let reveal = services.reveal.clone();
        use_effect_with((), move |_| {
            if let Some(modal) = modal_ref.cast::<Element>() {
                for backdrop in dom::html_elements(dom::query_all_in(&modal, "[data-gif]")) {
                    backdrops.adopt(backdrop);
                }
            }
            reveal.refresh();

            let listener = dom::document().map(|document| {
                EventListener::new_with_options(
                    &document,
                    "keydown",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                            return;
                        };
                        let Some(key) = ViewerKey::from_key(&event.key()) else {
                            return;
                        };
                        let Ok(mut viewer) = viewer.try_borrow_mut() else {
                            return;
                        };
                        if viewer.handle_key(key) && key != ViewerKey::Escape {
                            event.prevent_default();
                        }
                    },
                )
            });
            move || drop(listener)
        });
    }

    let gallery = props.gallery.clone().filter(|_| !items.is_empty()).map(|host| {
        let cards = html! {
            <>
                { for items.iter().enumerate().map(|(index, item)| {
                    gallery_card(&viewer, item, index, reduced_motion)
                }) }
            </>
        };
        yew::create_portal(cards, host)
    });

    let highlights = props
        .highlights
        .clone()
        .filter(|_| !props.payload.highlights.is_empty())
        .map(|host| {
            let cards = html! {
                <>{ for props.payload.highlights.iter().map(highlight_card) }</>
            };
            yew::create_portal(cards, host)
        });

    let slot = *stage;
    let active = slot.map_or(0, |slot| slot.index);
    let modal = (!items.is_empty()).then(|| {
        let current = slot.and_then(|slot| items.get(slot.index).map(|item| (slot, item)));
        let on_close = {
            let viewer = viewer.clone();
            Callback::from(move |_: MouseEvent| {
                if let Ok(mut viewer) = viewer.try_borrow_mut() {
                    viewer.close();
                }
            })
        };
        let on_backdrop = {
            let viewer = viewer.clone();
            let modal_ref = modal_ref.clone();
            Callback::from(move |event: MouseEvent| {
                let on_root = event
                    .target_dyn_into::<Element>()
                    .zip(modal_ref.cast::<Element>())
                    .is_some_and(|(target, root)| target == root);
                if !on_root {
                    return;
                }
                if let Ok(mut viewer) = viewer.try_borrow_mut() {
                    viewer.close();
                }
            })
        };

        html! {
            <div
                ref={modal_ref.clone()}
                class="modal project-media-modal"
                id={MODAL_ID}
                role="dialog"
                aria-modal="true"
                aria-hidden="true"
                tabindex="-1"
                style="display: none;"
                onclick={on_backdrop}
            >
                <div class="modal-content project-media-modal__content">
                    <div class="modal-video">
                        <div class="modal-gif" data-gif={services.config.modal_backdrop_path()}></div>
                    </div>
                    <div class="project-media-modal__layout">
                        <aside class="project-media-modal__nav" aria-label="Seleccionar recurso del proyecto">
                            <div class="project-media-modal__list">
                                { for items.iter().enumerate().map(|(index, tab_item)| {
                                    tab(&viewer, tab_item, index, index == active)
                                }) }
                            </div>
                        </aside>
                        <div class="project-media-modal__viewer">
                            <button
                                type="button"
                                class="modal-close project-media-modal__close"
                                aria-label="Cerrar visor"
                                onclick={on_close}
                            >
                                {"×"}
                            </button>
                            <div class="project-media-modal__stage">
                                if let Some((slot, item)) = current {
                                    <StageMedia
                                        key={slot.render.to_string()}
                                        item={item.clone()}
                                        reduced_motion={reduced_motion}
                                    />
                                }
                            </div>
                            <div class="project-media-modal__info">
                                <h3 class="project-media-modal__title">
                                    { current.map(|(_, item)| item.display_title()).unwrap_or_default() }
                                </h3>
                                <p class="project-media-modal__description">
                                    { current.map(|(_, item)| item.description.clone()).unwrap_or_default() }
                                </p>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        }
    });

    html! {
        <>
            { for gallery }
            { for highlights }
            { for modal }
        </>
    }
}

/// Mounts the detail island when the page embeds a media payload. A payload
/// that fails to parse disables the feature.
pub fn mount(services: &PageServices) -> Option<AppHandle<ProjectDetail>> {
    let raw = dom::by_id::<Element>(PAYLOAD_ELEMENT_ID)?
        .text_content()
        .unwrap_or_default();
    let payload = match ProjectMediaPayload::parse(&raw) {
        Ok(payload) => payload,
        Err(error) => {
            log_event(
                LogLevel::Error,
                "project_media_payload_invalid",
                serde_json::json!({ "error": error.to_string() }),
            );
            return None;
        }
    };

    let gallery = dom::query("[data-project-media-grid]");
    let highlights = dom::query("[data-project-highlights]");
    if gallery.is_none() && highlights.is_none() {
        return None;
    }
    if let Some(host) = gallery.as_ref().filter(|_| !payload.media.is_empty()) {
        host.set_inner_html("");
    }
    if let Some(host) = highlights.as_ref().filter(|_| !payload.highlights.is_empty()) {
        host.set_inner_html("");
    }

    let root = dom::document()?.create_element("div").ok()?;
    root.set_class_name("project-detail-root");
    dom::body()?.append_child(&root).ok()?;

    log_event(
        LogLevel::Info,
        "project_detail_ready",
        serde_json::json!({
            "media": payload.media.len(),
            "highlights": payload.highlights.len(),
        }),
    );

    let props = ProjectDetailProps {
        services: services.clone(),
        payload: Rc::new(payload),
        gallery,
        highlights,
    };
    Some(yew::Renderer::<ProjectDetail>::with_root_and_props(root, props).render())
}
