//! The page boundary.
//!
//! The [`Surface`] trait is everything the controller is allowed to do to the
//! page. The browser implementation lives in the `web` module; the
//! [`RecordingSurface`] keeps a log of calls instead, which is what the
//! `replay` command prints and what the controller tests assert against.
//!
//! Surface calls cannot fail. A binding that cannot find its element simply
//! does nothing, matching the widget's silent guard checks.

use crate::viewer::Transform;
use serde::Serialize;

/// Page mutations the lightbox controller performs.
pub trait Surface {
    /// Give a gallery image the "click to enlarge" affordance.
    fn mark_clickable(&mut self, gallery_index: usize);

    /// Make the overlay visible, creating it on first use.
    fn show_overlay(&mut self);

    fn hide_overlay(&mut self);

    /// Point the enlarged image at a new URL.
    fn set_image_source(&mut self, url: &str);

    fn apply_transform(&mut self, transform: &Transform);

    /// Suspend (`true`) or restore (`false`) page scrolling.
    fn set_scroll_locked(&mut self, locked: bool);

    /// Show or hide the previous/next arrows.
    fn set_navigation_visible(&mut self, visible: bool);
}

/// One recorded [`Surface`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "op")]
pub enum SurfaceOp {
    MarkClickable { index: usize },
    ShowOverlay,
    HideOverlay,
    SetImageSource { url: String },
    ApplyTransform { css: String, zoomed: bool },
    SetScrollLocked { locked: bool },
    SetNavigationVisible { visible: bool },
}

/// A [`Surface`] that records calls instead of touching a page.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Take the calls recorded so far, leaving the log empty.
    pub fn drain(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn mark_clickable(&mut self, gallery_index: usize) {
        self.ops.push(SurfaceOp::MarkClickable {
            index: gallery_index,
        });
    }

    fn show_overlay(&mut self) {
        self.ops.push(SurfaceOp::ShowOverlay);
    }

    fn hide_overlay(&mut self) {
        self.ops.push(SurfaceOp::HideOverlay);
    }

    fn set_image_source(&mut self, url: &str) {
        self.ops.push(SurfaceOp::SetImageSource {
            url: url.to_string(),
        });
    }

    fn apply_transform(&mut self, transform: &Transform) {
        self.ops.push(SurfaceOp::ApplyTransform {
            css: transform.to_css(),
            zoomed: transform.zoomed,
        });
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.ops.push(SurfaceOp::SetScrollLocked { locked });
    }

    fn set_navigation_visible(&mut self, visible: bool) {
        self.ops.push(SurfaceOp::SetNavigationVisible { visible });
    }
}
