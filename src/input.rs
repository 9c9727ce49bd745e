//! Input event model.
//!
//! Browser events are translated into these plain values before they reach
//! the controller, so the controller can be driven identically from the DOM
//! binding, from recorded sessions and from tests. Mouse and touch pointers
//! carry the same data; the controller does not distinguish them.

use crate::markup::ids;
use serde::{Deserialize, Serialize};

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClickTarget {
    /// A gallery image on the page, by gallery index.
    Thumbnail(usize),
    Close,
    /// The dimmed area around the image.
    Backdrop,
    Previous,
    Next,
    ZoomIn,
    ZoomOut,
    ZoomReset,
    /// The enlarged image itself.
    Image,
    Other,
}

impl ClickTarget {
    /// Map an overlay element id to its target. Unknown ids are [`Other`].
    ///
    /// [`Other`]: ClickTarget::Other
    pub fn from_element_id(id: &str) -> Self {
        match id {
            ids::OVERLAY => ClickTarget::Backdrop,
            ids::CLOSE => ClickTarget::Close,
            ids::PREV => ClickTarget::Previous,
            ids::NEXT => ClickTarget::Next,
            ids::ZOOM_IN => ClickTarget::ZoomIn,
            ids::ZOOM_OUT => ClickTarget::ZoomOut,
            ids::ZOOM_RESET => ClickTarget::ZoomReset,
            ids::IMAGE => ClickTarget::Image,
            _ => ClickTarget::Other,
        }
    }
}

/// Keys the lightbox reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Key {
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::from_key_name(&name)
    }
}

impl Key {
    /// Parse a `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Escape" => Key::Escape,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Keyboard modifiers held during a wheel gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        meta: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        meta: false,
    };

    /// Ctrl is what browsers set for trackpad pinch as well as ctrl+wheel.
    pub fn zoom_gesture(&self) -> bool {
        self.ctrl
    }
}

/// A single input event, already stripped of browser specifics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum InputEvent {
    Click {
        target: ClickTarget,
    },
    Key {
        key: Key,
    },
    Wheel {
        delta_y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerDown {
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    PointerMove {
        kind: PointerKind,
        x: f64,
        y: f64,
    },
    /// Mouse up, mouse leave, touch end.
    PointerUp {
        kind: PointerKind,
    },
}

impl InputEvent {
    pub fn click(target: ClickTarget) -> Self {
        InputEvent::Click { target }
    }

    pub fn key(key: Key) -> Self {
        InputEvent::Key { key }
    }

    pub fn wheel(delta_y: f64, modifiers: Modifiers) -> Self {
        InputEvent::Wheel { delta_y, modifiers }
    }

    pub fn pointer_down(kind: PointerKind, x: f64, y: f64) -> Self {
        InputEvent::PointerDown { kind, x, y }
    }

    pub fn pointer_move(kind: PointerKind, x: f64, y: f64) -> Self {
        InputEvent::PointerMove { kind, x, y }
    }

    pub fn pointer_up(kind: PointerKind) -> Self {
        InputEvent::PointerUp { kind }
    }
}

/// What the caller should do with the original browser event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventOutcome {
    /// Call `preventDefault()` on the browser event.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const PASS: EventOutcome = EventOutcome {
        prevent_default: false,
    };
    pub const CONSUMED: EventOutcome = EventOutcome {
        prevent_default: true,
    };
}
