//! # Simple Lightbox
//!
//! A small image lightbox for photography pages. Clicking an image in the
//! page content opens it full screen in an overlay, at the best resolution
//! its `srcset` offers, with zoom, drag-to-pan and keyboard/touch navigation
//! between all the large images on the page.
//!
//! # Architecture: Controller Behind a Surface
//!
//! ```text
//! browser events ─→ InputEvent ─→ Lightbox ─→ Surface ─→ page
//!                                  │
//!                                  ├── Gallery      (scanned once, read-only)
//!                                  └── ViewerState  (index, zoom, pan, drag)
//! ```
//!
//! The controller never touches the DOM. It talks to the page through the
//! [`surface::Surface`] trait, which has a browser implementation in `web`
//! (wasm32 only) and a recording implementation used by tests and by the
//! `replay` command. This separation exists for two reasons:
//!
//! - **Testability**: every behaviour, from wrap-around navigation to
//!   ctrl+wheel zoom, is exercised natively without a browser.
//! - **Debuggability**: a recorded session replays to a readable trace of
//!   exactly which page mutations the widget would make.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`controller`] | The `Lightbox` controller: scan, open, close, navigate, zoom, pan, event dispatch |
//! | [`gallery`] | Image candidates, gallery capture and wrap-around indices |
//! | [`srcset`] | `srcset` parsing and widest-source selection |
//! | [`viewer`] | Zoom clamping, pan offset, drag anchor, CSS transform |
//! | [`input`] | Browser-independent input events |
//! | [`surface`] | The page boundary trait and its recording implementation |
//! | [`markup`] | Overlay fragment, stylesheet and demo page (Maud) |
//! | [`config`] | `lightbox.toml` loading, validation and stock config |
//! | [`session`] | Recorded sessions and replay |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Modified Wheel Only
//!
//! Zoom reacts to ctrl+wheel (which is also what trackpad pinch produces), never
//! to a plain wheel. A lightbox that eats scroll events is unusable with a
//! trackpad.
//!
//! ## Silent No-Ops
//!
//! Nothing in the controller returns an error. An index past the end, a key
//! press while closed or a drag at zoom 1 simply does nothing. The only
//! fallible code is at the edges: reading config and session files.
//!
//! ## One Instance Per Page
//!
//! The browser binding keeps a single controller for the page. Dynamic pages
//! call `reinitializeLightbox()` after loading new content, which rescans
//! the gallery in place.

pub mod config;
pub mod controller;
pub mod gallery;
pub mod input;
pub mod markup;
pub mod output;
pub mod session;
pub mod srcset;
pub mod surface;
pub mod viewer;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::LightboxConfig;
pub use controller::Lightbox;
pub use gallery::{Gallery, ImageCandidate, ImageElement};
pub use surface::{RecordingSurface, Surface};
