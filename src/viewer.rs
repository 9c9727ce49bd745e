//! Viewer state: which image is showing, how far it is zoomed, and where it
//! has been dragged to.
//!
//! The enlarged image is drawn with a single CSS transform:
//!
//! ```text
//! scale(zoom) translate(offset.x / zoom px, offset.y / zoom px)
//! ```
//!
//! The translation is divided by the zoom because it is applied inside the
//! scaled coordinate space; this keeps the image glued to the cursor while
//! dragging at any zoom level.
//!
//! Panning is only possible while zoomed in. Whenever the zoom drops back to
//! 1 or below the offset snaps to the origin, so an image that fits the
//! screen is always centred.

use serde::Serialize;

/// Zoom factor bounds. Every zoom change is clamped into `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self { min: 0.5, max: 3.0 }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// A position in CSS pixels. Used both for pointer positions and the pan
/// offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Grab-and-drag state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DragState {
    pub active: bool,
    /// Pointer position minus the offset at drag start. The new offset is
    /// always `pointer - anchor`.
    pub anchor: Point,
}

impl DragState {
    fn start(&mut self, pointer: Point, offset: Point) {
        self.active = true;
        self.anchor = pointer - offset;
    }

    fn stop(&mut self) {
        self.active = false;
    }
}

/// What the surface needs to draw the enlarged image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Drives the `zoomed` class (grab cursor).
    pub zoomed: bool,
}

impl Transform {
    pub fn to_css(&self) -> String {
        format!(
            "scale({}) translate({}px, {}px)",
            self.scale, self.translate_x, self.translate_y
        )
    }
}

// Steps like 0.1 do not add up exactly in binary; without rounding, zooming
// in and back out lands on 1.0000000000000002 and panning stays enabled.
fn settle(zoom: f64) -> f64 {
    (zoom * 1e6).round() / 1e6
}

/// Mutable viewer record for the open lightbox.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerState {
    index: usize,
    zoom: f64,
    offset: Point,
    drag: DragState,
    #[serde(skip)]
    limits: ZoomLimits,
}

impl ViewerState {
    pub fn new(index: usize, limits: ZoomLimits) -> Self {
        Self {
            index,
            zoom: 1.0,
            offset: Point::ORIGIN,
            drag: DragState::default(),
            limits,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.active
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom > 1.0
    }

    /// Back to zoom 1, centred, not dragging.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.offset = Point::ORIGIN;
        self.drag.stop();
    }

    /// Switch to another image. Always resets zoom and pan.
    pub fn show(&mut self, index: usize) {
        self.index = index;
        self.reset();
    }

    /// Change the zoom by `delta`, clamped to the limits. Returns the new
    /// zoom.
    pub fn zoom_by(&mut self, delta: f64) -> f64 {
        self.zoom = self.limits.clamp(settle(self.zoom + delta));
        if !self.is_zoomed() {
            self.offset = Point::ORIGIN;
        }
        self.zoom
    }

    /// Arm a drag at `pointer`. Ignored unless zoomed in.
    pub fn begin_drag(&mut self, pointer: Point) -> bool {
        if !self.is_zoomed() {
            return false;
        }
        self.drag.start(pointer, self.offset);
        true
    }

    /// Move the image with the pointer. Returns whether the offset changed.
    pub fn drag_to(&mut self, pointer: Point) -> bool {
        if !self.drag.active || !self.is_zoomed() {
            return false;
        }
        self.offset = pointer - self.drag.anchor;
        true
    }

    pub fn end_drag(&mut self) {
        self.drag.stop();
    }

    pub fn transform(&self) -> Transform {
        Transform {
            scale: self.zoom,
            translate_x: self.offset.x / self.zoom,
            translate_y: self.offset.y / self.zoom,
            zoomed: self.is_zoomed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer() -> ViewerState {
        ViewerState::new(0, ZoomLimits::default())
    }

    // =========================================================================
    // zoom
    // =========================================================================

    #[test]
    fn starts_at_unit_zoom_centred() {
        let v = viewer();
        assert_eq!(v.zoom(), 1.0);
        assert_eq!(v.offset(), Point::ORIGIN);
        assert!(!v.is_dragging());
    }

    #[test]
    fn zoom_clamps_to_upper_bound() {
        let mut v = viewer();
        for _ in 0..50 {
            v.zoom_by(0.2);
        }
        assert_eq!(v.zoom(), 3.0);
    }

    #[test]
    fn zoom_clamps_to_lower_bound() {
        let mut v = viewer();
        for _ in 0..50 {
            v.zoom_by(-0.1);
        }
        assert_eq!(v.zoom(), 0.5);
    }

    #[test]
    fn zoom_stays_in_bounds_for_mixed_sequences() {
        let mut v = viewer();
        let deltas = [0.1, 0.2, -0.1, 5.0, -0.2, -7.5, 0.1, 0.1, 2.9, -0.3, -0.2];
        for (i, d) in deltas.iter().cycle().take(200).enumerate() {
            let z = v.zoom_by(*d * if i % 3 == 0 { -1.0 } else { 1.0 });
            assert!((0.5..=3.0).contains(&z), "zoom {z} out of range");
        }
    }

    #[test]
    fn zoom_in_then_out_returns_to_exactly_one() {
        let mut v = viewer();
        v.zoom_by(0.1);
        v.zoom_by(-0.1);
        assert_eq!(v.zoom(), 1.0);
        assert!(!v.is_zoomed());
    }

    #[test]
    fn rounding_never_undercuts_a_fine_grained_minimum() {
        let limits = ZoomLimits {
            min: 0.1234564,
            max: 3.0,
        };
        let mut v = ViewerState::new(0, limits);
        v.zoom_by(-10.0);
        assert_eq!(v.zoom(), 0.1234564);
    }

    #[test]
    fn custom_limits_are_respected() {
        let mut v = ViewerState::new(0, ZoomLimits { min: 1.0, max: 1.5 });
        v.zoom_by(10.0);
        assert_eq!(v.zoom(), 1.5);
        v.zoom_by(-10.0);
        assert_eq!(v.zoom(), 1.0);
    }

    // =========================================================================
    // pan
    // =========================================================================

    #[test]
    fn drag_ignored_at_unit_zoom() {
        let mut v = viewer();
        assert!(!v.begin_drag(Point::new(10.0, 10.0)));
        assert!(!v.drag_to(Point::new(50.0, 80.0)));
        assert_eq!(v.offset(), Point::ORIGIN);
    }

    #[test]
    fn drag_ignored_when_zoomed_out() {
        let mut v = viewer();
        v.zoom_by(-0.3);
        assert!(!v.begin_drag(Point::new(10.0, 10.0)));
        assert!(!v.drag_to(Point::new(50.0, 80.0)));
        assert_eq!(v.offset(), Point::ORIGIN);
    }

    #[test]
    fn drag_moves_by_pointer_delta() {
        let mut v = viewer();
        v.zoom_by(1.0);
        assert!(v.begin_drag(Point::new(100.0, 100.0)));
        assert!(v.drag_to(Point::new(130.0, 80.0)));
        assert_eq!(v.offset(), Point::new(30.0, -20.0));
    }

    #[test]
    fn second_drag_continues_from_previous_offset() {
        let mut v = viewer();
        v.zoom_by(1.0);
        v.begin_drag(Point::new(0.0, 0.0));
        v.drag_to(Point::new(10.0, 10.0));
        v.end_drag();

        v.begin_drag(Point::new(200.0, 200.0));
        v.drag_to(Point::new(205.0, 190.0));
        assert_eq!(v.offset(), Point::new(15.0, 0.0));
    }

    #[test]
    fn move_without_drag_does_nothing() {
        let mut v = viewer();
        v.zoom_by(1.0);
        assert!(!v.drag_to(Point::new(40.0, 40.0)));
        v.begin_drag(Point::new(0.0, 0.0));
        v.end_drag();
        assert!(!v.drag_to(Point::new(40.0, 40.0)));
        assert_eq!(v.offset(), Point::ORIGIN);
    }

    #[test]
    fn zooming_back_to_one_recentres() {
        let mut v = viewer();
        v.zoom_by(0.5);
        v.begin_drag(Point::new(0.0, 0.0));
        v.drag_to(Point::new(60.0, 40.0));
        v.zoom_by(-0.5);
        assert_eq!(v.offset(), Point::ORIGIN);
    }

    #[test]
    fn zooming_while_still_above_one_keeps_offset() {
        let mut v = viewer();
        v.zoom_by(1.0);
        v.begin_drag(Point::new(0.0, 0.0));
        v.drag_to(Point::new(60.0, 40.0));
        v.zoom_by(-0.5);
        assert_eq!(v.offset(), Point::new(60.0, 40.0));
    }

    // =========================================================================
    // reset and transform
    // =========================================================================

    #[test]
    fn show_resets_zoom_and_pan() {
        let mut v = viewer();
        v.zoom_by(1.0);
        v.begin_drag(Point::new(0.0, 0.0));
        v.drag_to(Point::new(25.0, 25.0));
        v.show(3);
        assert_eq!(v.index(), 3);
        assert_eq!(v.zoom(), 1.0);
        assert_eq!(v.offset(), Point::ORIGIN);
        assert!(!v.is_dragging());
    }

    #[test]
    fn transform_divides_translation_by_zoom() {
        let mut v = viewer();
        v.zoom_by(1.0);
        v.begin_drag(Point::new(0.0, 0.0));
        v.drag_to(Point::new(40.0, -20.0));
        let t = v.transform();
        assert_eq!(t.scale, 2.0);
        assert_eq!(t.translate_x, 20.0);
        assert_eq!(t.translate_y, -10.0);
        assert!(t.zoomed);
        assert_eq!(t.to_css(), "scale(2) translate(20px, -10px)");
    }

    #[test]
    fn identity_transform_css() {
        assert_eq!(viewer().transform().to_css(), "scale(1) translate(0px, 0px)");
        assert!(!viewer().transform().zoomed);
    }
}
