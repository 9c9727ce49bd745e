//! The lightbox controller.
//!
//! [`Lightbox`] owns the gallery, the viewer state and a [`Surface`], and
//! exposes the widget's operations: scan, open, close, next/previous, zoom
//! and pan. [`Lightbox::handle`] routes an [`InputEvent`] to the right
//! operation and reports whether the browser default should be suppressed.
//!
//! Operations never fail. Anything that does not apply right now (an index
//! past the end, navigation with a single image, keys while closed, an
//! unmodified wheel) is a silent no-op and returns `false`.
//!
//! The viewer state is created on the first open and reused afterwards. Every
//! change to it is pushed to the surface straight away, so the page always
//! reflects the state.

use crate::config::LightboxConfig;
use crate::gallery::{self, Gallery, ImageElement};
use crate::input::{ClickTarget, EventOutcome, InputEvent, Key};
use crate::surface::Surface;
use crate::viewer::{Point, ViewerState};
use tracing::debug;

pub struct Lightbox<S: Surface> {
    config: LightboxConfig,
    gallery: Gallery,
    viewer: Option<ViewerState>,
    open: bool,
    surface: S,
}

impl<S: Surface> Lightbox<S> {
    /// A controller with an empty gallery. Call [`scan`](Self::scan) next.
    pub fn new(config: LightboxConfig, surface: S) -> Self {
        Self {
            config,
            gallery: Gallery::default(),
            viewer: None,
            open: false,
            surface,
        }
    }

    pub fn config(&self) -> &LightboxConfig {
        &self.config
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    /// `None` until the first open.
    pub fn viewer(&self) -> Option<&ViewerState> {
        self.viewer.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// URL currently shown in the lightbox, while open.
    pub fn current_source(&self) -> Option<&str> {
        if !self.open {
            return None;
        }
        let index = self.viewer.as_ref()?.index();
        self.gallery.get(index).map(|image| image.best_source())
    }

    // =========================================================================
    // Gallery capture
    // =========================================================================

    /// Rebuild the gallery from the page's images and mark each qualifying
    /// image clickable. Returns the positions in `elements` that made it in.
    ///
    /// Safe to call repeatedly; this is how dynamically loaded content is
    /// picked up. If the lightbox is open on an image that no longer exists
    /// it is closed.
    pub fn scan(&mut self, elements: &[ImageElement]) -> Vec<usize> {
        let (gallery, positions) = gallery::scan(elements, self.config.gallery.min_dimension);
        debug!(
            found = elements.len(),
            kept = gallery.len(),
            "gallery scanned"
        );
        self.gallery = gallery;

        for index in 0..self.gallery.len() {
            self.surface.mark_clickable(index);
        }

        let stale = self
            .viewer
            .as_ref()
            .is_some_and(|viewer| viewer.index() >= self.gallery.len());
        if self.open && stale {
            self.close();
        } else if self.open {
            self.surface
                .set_navigation_visible(self.gallery.is_navigable());
        }
        positions
    }

    // =========================================================================
    // Open / close / navigate
    // =========================================================================

    /// Show gallery image `index` in the overlay, at zoom 1 and centred, using
    /// its widest source. Locks page scrolling.
    pub fn open(&mut self, index: usize) -> bool {
        let Some(image) = self.gallery.get(index) else {
            debug!(index, len = self.gallery.len(), "open ignored: no such image");
            return false;
        };
        let source = image.best_source().to_string();
        let limits = self.config.zoom.limits();

        let viewer = self
            .viewer
            .get_or_insert_with(|| ViewerState::new(index, limits));
        viewer.show(index);
        let transform = viewer.transform();

        self.surface.apply_transform(&transform);
        self.surface.set_image_source(&source);
        self.surface.show_overlay();
        self.surface.set_scroll_locked(true);
        self.surface
            .set_navigation_visible(self.gallery.is_navigable());
        self.open = true;

        debug!(index, source = %source, "lightbox opened");
        true
    }

    /// Hide the overlay and restore page scrolling.
    pub fn close(&mut self) -> bool {
        if !self.open {
            return false;
        }
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.end_drag();
        }
        self.surface.hide_overlay();
        self.surface.set_scroll_locked(false);
        self.open = false;
        debug!("lightbox closed");
        true
    }

    /// Advance to the following image, wrapping to the first.
    pub fn next(&mut self) -> bool {
        let target = self
            .current_index()
            .and_then(|index| self.gallery.next_index(index));
        self.navigate_to(target)
    }

    /// Go back to the preceding image, wrapping to the last.
    pub fn previous(&mut self) -> bool {
        let target = self
            .current_index()
            .and_then(|index| self.gallery.previous_index(index));
        self.navigate_to(target)
    }

    fn current_index(&self) -> Option<usize> {
        if !self.open {
            return None;
        }
        self.viewer.as_ref().map(ViewerState::index)
    }

    fn navigate_to(&mut self, target: Option<usize>) -> bool {
        let Some(index) = target else {
            return false;
        };
        let Some(image) = self.gallery.get(index) else {
            return false;
        };
        let source = image.best_source().to_string();
        let Some(viewer) = self.viewer.as_mut() else {
            return false;
        };
        viewer.show(index);
        let transform = viewer.transform();

        self.surface.apply_transform(&transform);
        self.surface.set_image_source(&source);
        debug!(index, source = %source, "lightbox navigated");
        true
    }

    // =========================================================================
    // Zoom and pan
    // =========================================================================

    fn open_viewer(&mut self) -> Option<&mut ViewerState> {
        if !self.open {
            return None;
        }
        self.viewer.as_mut()
    }

    /// Change the zoom by `delta`, clamped to the configured range. Dropping
    /// to 1 or below recentres the image.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        let Some(viewer) = self.open_viewer() else {
            return false;
        };
        viewer.zoom_by(delta);
        let transform = viewer.transform();
        self.surface.apply_transform(&transform);
        true
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.zoom.button_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-self.config.zoom.button_step)
    }

    /// Back to zoom 1, centred.
    pub fn reset_zoom(&mut self) -> bool {
        let Some(viewer) = self.open_viewer() else {
            return false;
        };
        viewer.reset();
        let transform = viewer.transform();
        self.surface.apply_transform(&transform);
        true
    }

    /// Start dragging at `pointer`. Only arms while zoomed in.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        self.open_viewer()
            .is_some_and(|viewer| viewer.begin_drag(pointer))
    }

    /// Move the image with the pointer during a drag. The offset becomes
    /// `pointer - anchor`, where the anchor was fixed by `begin_drag`.
    pub fn pan(&mut self, pointer: Point) -> bool {
        let Some(viewer) = self.open_viewer() else {
            return false;
        };
        if !viewer.drag_to(pointer) {
            return false;
        }
        let transform = viewer.transform();
        self.surface.apply_transform(&transform);
        true
    }

    pub fn end_drag(&mut self) {
        if let Some(viewer) = self.viewer.as_mut() {
            viewer.end_drag();
        }
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    /// Route one input event to its operation.
    pub fn handle(&mut self, event: InputEvent) -> EventOutcome {
        match event {
            InputEvent::Click { target } => self.handle_click(target),
            InputEvent::Key { key } => {
                self.handle_key(key);
                EventOutcome::PASS
            }
            InputEvent::Wheel { delta_y, modifiers } => {
                // Plain wheel scrolls the page; only ctrl+wheel (and pinch) zooms.
                if !modifiers.zoom_gesture() || !self.open {
                    return EventOutcome::PASS;
                }
                let step = self.config.zoom.wheel_step;
                let delta = if delta_y > 0.0 { -step } else { step };
                self.zoom_by(delta);
                EventOutcome::CONSUMED
            }
            InputEvent::PointerDown { x, y, .. } => consumed_if(self.begin_drag(Point::new(x, y))),
            InputEvent::PointerMove { x, y, .. } => consumed_if(self.pan(Point::new(x, y))),
            InputEvent::PointerUp { .. } => {
                self.end_drag();
                EventOutcome::PASS
            }
        }
    }

    fn handle_click(&mut self, target: ClickTarget) -> EventOutcome {
        match target {
            ClickTarget::Thumbnail(index) => return consumed_if(self.open(index)),
            ClickTarget::Close | ClickTarget::Backdrop => {
                self.close();
            }
            ClickTarget::Previous => {
                self.previous();
            }
            ClickTarget::Next => {
                self.next();
            }
            ClickTarget::ZoomIn => {
                self.zoom_in();
            }
            ClickTarget::ZoomOut => {
                self.zoom_out();
            }
            ClickTarget::ZoomReset => {
                self.reset_zoom();
            }
            ClickTarget::Image | ClickTarget::Other => {}
        }
        EventOutcome::PASS
    }

    fn handle_key(&mut self, key: Key) {
        if !self.open {
            return;
        }
        match key {
            Key::Escape => {
                self.close();
            }
            Key::ArrowLeft => {
                self.previous();
            }
            Key::ArrowRight => {
                self.next();
            }
            Key::Other => {}
        }
    }
}

fn consumed_if(handled: bool) -> EventOutcome {
    if handled {
        EventOutcome::CONSUMED
    } else {
        EventOutcome::PASS
    }
}
