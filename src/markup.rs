//! Overlay markup and stylesheet.
//!
//! The overlay is one fragment appended to `<body>`:
//!
//! ```text
//! div#lightbox.lightbox                 backdrop, hidden until opened
//! ├── span#lightbox-close               ×
//! ├── div#lightbox-prev.lightbox-nav    ❮
//! ├── div#lightbox-next.lightbox-nav    ❯
//! ├── div.lightbox-zoom-controls
//! │   ├── button#lightbox-zoom-in       +
//! │   ├── button#lightbox-zoom-out      -
//! │   └── button#lightbox-zoom-reset    Reset
//! └── div.lightbox-content
//!     └── img#lightbox-image
//! ```
//!
//! Click routing works purely on these ids (see
//! [`ClickTarget::from_element_id`](crate::input::ClickTarget::from_element_id)),
//! so they are fixed. The stylesheet combines theme variables from config
//! with the static rules in `static/lightbox.css`.
//!
//! HTML is generated with [maud](https://maud.lambda.xyz/); all interpolation
//! is escaped.

use crate::config::{self, LightboxConfig};
use crate::gallery::ImageElement;
use maud::{DOCTYPE, Markup, PreEscaped, html};

/// Element ids of the overlay.
pub mod ids {
    pub const OVERLAY: &str = "lightbox";
    pub const CLOSE: &str = "lightbox-close";
    pub const PREV: &str = "lightbox-prev";
    pub const NEXT: &str = "lightbox-next";
    pub const ZOOM_IN: &str = "lightbox-zoom-in";
    pub const ZOOM_OUT: &str = "lightbox-zoom-out";
    pub const ZOOM_RESET: &str = "lightbox-zoom-reset";
    pub const IMAGE: &str = "lightbox-image";
}

/// Class toggled on the enlarged image while zoomed in.
pub const ZOOMED_CLASS: &str = "zoomed";

/// Tooltip given to gallery images.
pub const CLICKABLE_TITLE: &str = "Click to enlarge";

const CSS_STATIC: &str = include_str!("../static/lightbox.css");

/// The overlay fragment, initially hidden.
pub fn overlay() -> Markup {
    html! {
        div.lightbox id=(ids::OVERLAY) style="display: none" {
            span.lightbox-close id=(ids::CLOSE) { "\u{00d7}" }
            div.lightbox-nav.lightbox-prev id=(ids::PREV) { "\u{276e}" }
            div.lightbox-nav.lightbox-next id=(ids::NEXT) { "\u{276f}" }
            div.lightbox-zoom-controls {
                button.lightbox-zoom-btn id=(ids::ZOOM_IN) type="button" { "+" }
                button.lightbox-zoom-btn id=(ids::ZOOM_OUT) type="button" { "-" }
                button.lightbox-zoom-btn id=(ids::ZOOM_RESET) type="button" { "Reset" }
            }
            div.lightbox-content {
                img.lightbox-image id=(ids::IMAGE) src="" alt="";
            }
        }
    }
}

/// Full overlay stylesheet for the configured theme.
pub fn stylesheet(config: &LightboxConfig) -> String {
    format!(
        "{}\n\n{}",
        config::generate_theme_css(&config.theme),
        CSS_STATIC
    )
}

/// A standalone page showing `images` inside a `.content` container, with the
/// overlay and its stylesheet. `script` is the URL of the generated wasm-bindgen
/// module (`--target web`); when given, the page imports and initialises it.
pub fn demo_page(
    images: &[ImageElement],
    config: &LightboxConfig,
    script: Option<&str>,
) -> Markup {
    let css = stylesheet(config);
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Lightbox demo" }
                style { (PreEscaped(css)) }
            }
            body {
                main.content {
                    @for image in images {
                        figure {
                            img src=(image.src)
                                srcset=[image.srcset.as_deref()]
                                width=(image.natural_width)
                                height=(image.natural_height)
                                loading="lazy"
                                alt="";
                        }
                    }
                }
                (overlay())
                @if let Some(src) = script {
                    script type="module" { (PreEscaped(boot_script(src))) }
                }
            }
        }
    }
}

/// Inline module that loads the binding. The URL is embedded as a JSON string
/// literal with `</` broken up so it cannot end the script element.
fn boot_script(src: &str) -> String {
    let url = serde_json::Value::from(src).to_string().replace("</", "<\\/");
    format!("import init from {url};\ninit();")
}
