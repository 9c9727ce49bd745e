//! Browser binding.
//!
//! Wires a [`Lightbox`] to the live page: a [`DomSurface`] performs the
//! surface calls on real elements, and document/image listeners translate
//! DOM events into [`InputEvent`]s. There is one controller per page, kept
//! in a `thread_local!`.
//!
//! Pages may set `window.lightboxConfig` to a TOML string (same format as
//! `lightbox.toml`) before the module loads. Anything missing falls back to
//! the stock defaults; an invalid config is logged and ignored.
//!
//! Log events go to the browser console at `warn` level, or `debug` when the
//! page sets `window.lightboxDebug = true`. `reinitializeLightbox` is both a
//! module export and a `window` property.

use crate::config::{self, LightboxConfig};
use crate::controller::Lightbox;
use crate::gallery::ImageElement;
use crate::input::{ClickTarget, EventOutcome, InputEvent, Key, Modifiers, PointerKind};
use crate::markup::{self, CLICKABLE_TITLE, ZOOMED_CLASS, ids};
use crate::surface::Surface;
use crate::viewer::Transform;
use js_sys::Reflect;
use std::cell::{Cell, RefCell};
use std::io;
use tracing::{Level, Metadata, debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement, KeyboardEvent,
    MouseEvent, TouchEvent, WheelEvent, Window,
};

/// Attribute holding a page image's gallery index.
const INDEX_ATTR: &str = "data-lightbox-index";
/// Set on page images still loading when scanned; they trigger a rescan once
/// their natural size is known.
const PENDING_ATTR: &str = "data-lightbox-pending";
const STYLE_ID: &str = "lightbox-style";

thread_local! {
    static LIGHTBOX: RefCell<Option<Lightbox<DomSurface>>> = const { RefCell::new(None) };
    static LISTENING: Cell<bool> = const { Cell::new(false) };
}

fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document.get_element_by_id(id)?.dyn_into::<T>().ok()
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    let _ = element.style().set_property(property, value);
}

fn display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

// =============================================================================
// DomSurface
// =============================================================================

/// [`Surface`] over the live document. Missing elements are skipped silently.
pub struct DomSurface {
    document: Document,
    stylesheet: String,
    /// Page images in gallery order.
    images: Vec<HtmlImageElement>,
}

impl DomSurface {
    pub fn new(document: Document, config: &LightboxConfig) -> Self {
        Self {
            document,
            stylesheet: markup::stylesheet(config),
            images: Vec::new(),
        }
    }

    /// Append the stylesheet and the overlay fragment, unless already present.
    fn ensure_overlay(&self) {
        if self.document.get_element_by_id(STYLE_ID).is_none() {
            if let Ok(Some(head)) = self.document.query_selector("head") {
                let style = format!(r#"<style id="{}">{}</style>"#, STYLE_ID, self.stylesheet);
                let _ = head.insert_adjacent_html("beforeend", &style);
            }
        }
        if self.document.get_element_by_id(ids::OVERLAY).is_some() {
            return;
        }
        let Some(body) = self.document.body() else {
            return;
        };
        let _ = body.insert_adjacent_html("beforeend", &markup::overlay().into_string());
    }

    /// Replace the gallery images. Images dropped from the gallery lose their
    /// index attribute so clicks on them are no longer routed.
    fn set_images(&mut self, images: Vec<HtmlImageElement>) {
        for image in &self.images {
            let _ = image.remove_attribute(INDEX_ATTR);
        }
        self.images = images;
    }

    fn element(&self, id: &str) -> Option<HtmlElement> {
        by_id(&self.document, id)
    }
}

impl Surface for DomSurface {
    fn mark_clickable(&mut self, gallery_index: usize) {
        let Some(image) = self.images.get(gallery_index) else {
            return;
        };
        set_style(image, "cursor", "pointer");
        image.set_title(CLICKABLE_TITLE);
        let _ = image.set_attribute(INDEX_ATTR, &gallery_index.to_string());
    }

    fn show_overlay(&mut self) {
        self.ensure_overlay();
        if let Some(overlay) = self.element(ids::OVERLAY) {
            set_style(&overlay, "display", "block");
        }
    }

    fn hide_overlay(&mut self) {
        if let Some(overlay) = self.element(ids::OVERLAY) {
            set_style(&overlay, "display", "none");
        }
    }

    fn set_image_source(&mut self, url: &str) {
        if let Some(image) = by_id::<HtmlImageElement>(&self.document, ids::IMAGE) {
            image.set_src(url);
        }
    }

    fn apply_transform(&mut self, transform: &Transform) {
        let Some(image) = self.element(ids::IMAGE) else {
            return;
        };
        set_style(&image, "transform", &transform.to_css());
        let _ = image
            .class_list()
            .toggle_with_force(ZOOMED_CLASS, transform.zoomed);
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        if let Some(body) = self.document.body() {
            set_style(&body, "overflow", if locked { "hidden" } else { "" });
        }
    }

    fn set_navigation_visible(&mut self, visible: bool) {
        for id in [ids::PREV, ids::NEXT] {
            if let Some(arrow) = self.element(id) {
                set_style(&arrow, "display", display(visible));
            }
        }
    }
}

// =============================================================================
// Page scanning
// =============================================================================

fn page_images(document: &Document, selector: &str) -> Vec<HtmlImageElement> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        warn!(selector, "invalid content selector");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.get(i))
        .filter_map(|node| node.dyn_into::<HtmlImageElement>().ok())
        .collect()
}

fn read_image(image: &HtmlImageElement) -> ImageElement {
    let srcset = image.srcset();
    ImageElement {
        src: image.src(),
        srcset: (!srcset.trim().is_empty()).then_some(srcset),
        natural_width: image.natural_width(),
        natural_height: image.natural_height(),
    }
}

/// Rescan once `image` has loaded. Its natural size reads as zero until then.
fn rescan_when_loaded(image: &HtmlImageElement) {
    if image.complete() || image.has_attribute(PENDING_ATTR) {
        return;
    }
    let _ = image.set_attribute(PENDING_ATTR, "");
    let loaded = image.clone();
    listen(image, "load", move |_| {
        if loaded.has_attribute(PENDING_ATTR) {
            let _ = loaded.remove_attribute(PENDING_ATTR);
            rescan();
        }
    });
}

/// Re-read the page images and rebuild the gallery.
fn rescan() {
    LIGHTBOX.with(|cell| {
        let mut slot = cell.borrow_mut();
        let Some(lightbox) = slot.as_mut() else {
            return;
        };
        let gallery = &lightbox.config().gallery;
        let min_dimension = gallery.min_dimension;
        let page = page_images(&lightbox.surface().document, &gallery.content_selector);
        let elements: Vec<ImageElement> = page.iter().map(read_image).collect();
        for image in &page {
            rescan_when_loaded(image);
        }

        let kept = page
            .into_iter()
            .zip(&elements)
            .filter(|(_, element)| element.qualifies(min_dimension))
            .map(|(image, _)| image)
            .collect();
        lightbox.surface_mut().set_images(kept);
        lightbox.scan(&elements);
    });
}

fn dispatch(event: InputEvent) -> EventOutcome {
    LIGHTBOX.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map_or(EventOutcome::PASS, |lightbox| lightbox.handle(event))
    })
}

// =============================================================================
// Listeners
// =============================================================================

fn listen(target: &EventTarget, kind: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
    closure.forget();
}

/// Dispatch `input` and suppress the browser default if the lightbox used it.
fn forward(event: &Event, input: InputEvent) {
    if dispatch(input).prevent_default {
        event.prevent_default();
    }
}

fn click_target(element: &Element) -> ClickTarget {
    if let Some(index) = element
        .get_attribute(INDEX_ATTR)
        .and_then(|value| value.parse().ok())
    {
        return ClickTarget::Thumbnail(index);
    }
    ClickTarget::from_element_id(&element.id())
}

fn touch_point(event: &TouchEvent) -> Option<(f64, f64)> {
    let touch = event.touches().get(0)?;
    Some((touch.client_x() as f64, touch.client_y() as f64))
}

fn attach_listeners(document: &Document) {
    listen(document, "click", |event| {
        let Some(element) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        forward(&event, InputEvent::click(click_target(&element)));
    });

    listen(document, "keydown", |event| {
        let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        forward(&event, InputEvent::key(Key::from_key_name(&keyboard.key())));
    });

    let Some(image) = document.get_element_by_id(ids::IMAGE) else {
        warn!("overlay image missing, pan and zoom gestures disabled");
        return;
    };

    listen(&image, "mousedown", |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (x, y) = (mouse.client_x() as f64, mouse.client_y() as f64);
        forward(&event, InputEvent::pointer_down(PointerKind::Mouse, x, y));
    });
    listen(&image, "mousemove", |event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let (x, y) = (mouse.client_x() as f64, mouse.client_y() as f64);
        forward(&event, InputEvent::pointer_move(PointerKind::Mouse, x, y));
    });
    for kind in ["mouseup", "mouseleave"] {
        listen(&image, kind, |event| {
            forward(&event, InputEvent::pointer_up(PointerKind::Mouse));
        });
    }

    listen(&image, "wheel", |event| {
        let Some(wheel) = event.dyn_ref::<WheelEvent>() else {
            return;
        };
        let modifiers = Modifiers {
            ctrl: wheel.ctrl_key(),
            meta: wheel.meta_key(),
        };
        forward(&event, InputEvent::wheel(wheel.delta_y(), modifiers));
    });

    listen(&image, "touchstart", |event| {
        let Some((x, y)) = event.dyn_ref::<TouchEvent>().and_then(touch_point) else {
            return;
        };
        forward(&event, InputEvent::pointer_down(PointerKind::Touch, x, y));
    });
    listen(&image, "touchmove", |event| {
        let Some((x, y)) = event.dyn_ref::<TouchEvent>().and_then(touch_point) else {
            return;
        };
        forward(&event, InputEvent::pointer_move(PointerKind::Touch, x, y));
    });
    listen(&image, "touchend", |event| {
        forward(&event, InputEvent::pointer_up(PointerKind::Touch));
    });
}

// =============================================================================
// Console logging
// =============================================================================

/// Buffers one formatted event and hands it to the console when dropped.
struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buf);
        let line = JsValue::from_str(text.trim_end());
        match self.level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> ConsoleWriter {
        ConsoleWriter {
            level: Level::INFO,
            buf: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> ConsoleWriter {
        ConsoleWriter {
            level: *meta.level(),
            buf: Vec::new(),
        }
    }
}

fn flag(window: &Window, name: &str) -> bool {
    Reflect::get(window, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.as_bool())
        .unwrap_or(false)
}

fn init_logging(window: &Window) {
    let filter = if flag(window, "lightboxDebug") {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    // There is no wall clock on wasm32-unknown-unknown; the console stamps
    // entries itself.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ConsoleMakeWriter)
        .without_time()
        .with_ansi(false)
        .try_init();
}

// =============================================================================
// Entry points
// =============================================================================

/// Config from `window.lightboxConfig`, or the stock defaults.
fn page_config() -> LightboxConfig {
    let source = web_sys::window()
        .and_then(|window| Reflect::get(&window, &JsValue::from_str("lightboxConfig")).ok())
        .and_then(|value| value.as_string());
    let Some(source) = source else {
        return LightboxConfig::default();
    };
    let overlay = match toml::from_str::<toml::Value>(&source) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "ignoring window.lightboxConfig");
            return LightboxConfig::default();
        }
    };
    config::resolve_config(config::stock_defaults_value(), Some(overlay)).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring window.lightboxConfig");
        LightboxConfig::default()
    })
}

/// Build the controller, inject the overlay and start listening. Running it
/// again only rescans.
pub fn install() {
    let Some(document) = document() else {
        return;
    };
    LIGHTBOX.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            let config = page_config();
            let surface = DomSurface::new(document.clone(), &config);
            surface.ensure_overlay();
            *slot = Some(Lightbox::new(config, surface));
        }
    });
    if !LISTENING.replace(true) {
        attach_listeners(&document);
    }
    rescan();
    debug!("lightbox installed");
}

/// Rescan the page after content was added or removed.
#[wasm_bindgen(js_name = reinitializeLightbox)]
pub fn reinitialize_lightbox() {
    install();
}

/// Publish `window.reinitializeLightbox` for scripts that do not import the
/// module.
fn expose_reinitialize(window: &Window) {
    let closure = Closure::wrap(Box::new(reinitialize_lightbox) as Box<dyn FnMut()>);
    let _ = Reflect::set(
        window,
        &JsValue::from_str("reinitializeLightbox"),
        closure.as_ref(),
    );
    closure.forget();
}

#[wasm_bindgen(start)]
pub fn start() {
    let Some(window) = web_sys::window() else {
        return;
    };
    init_logging(&window);
    expose_reinitialize(&window);
    let Some(document) = window.document() else {
        return;
    };
    if document.ready_state() != "loading" {
        install();
        return;
    }
    listen(&document, "DOMContentLoaded", |_| install());
}
