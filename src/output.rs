//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.
//!
//! # Replay
//!
//! ```text
//! Gallery: 2 images
//!     mark clickable #1
//!     mark clickable #2
//! 001 click thumbnail #1 → open #1, zoom 1.00 [default prevented]
//!     transform scale(1) translate(0px, 0px)
//!     source a-800.jpg
//!     show overlay
//!     lock scroll
//!     show navigation
//! 002 wheel -100 ctrl → open #1, zoom 1.10 [default prevented]
//!     transform scale(1.1) translate(0px, 0px) (zoomed)
//! 003 key Escape → closed
//!     hide overlay
//!     unlock scroll
//! ```
//!
//! Gallery positions are shown 1-based, like the rest of the output.
//!
//! # Resolve
//!
//! ```text
//! dawn.jpg
//!     100w dawn-100.jpg
//!     800w dawn-800.jpg ←
//! Resolved: dawn-800.jpg
//! ```

use crate::gallery::ImageCandidate;
use crate::input::{ClickTarget, InputEvent, Key, PointerKind};
use crate::session::{Replay, TraceStep};
use crate::surface::SurfaceOp;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn describe_event(event: &InputEvent) -> String {
    match event {
        InputEvent::Click { target } => format!("click {}", describe_target(target)),
        InputEvent::Key { key } => match key {
            Key::Escape => "key Escape".to_string(),
            Key::ArrowLeft => "key ArrowLeft".to_string(),
            Key::ArrowRight => "key ArrowRight".to_string(),
            Key::Other => "key (other)".to_string(),
        },
        InputEvent::Wheel { delta_y, modifiers } => {
            if modifiers.zoom_gesture() {
                format!("wheel {} ctrl", delta_y)
            } else {
                format!("wheel {}", delta_y)
            }
        }
        InputEvent::PointerDown { kind, x, y } => {
            format!("{} down ({x}, {y})", pointer_name(*kind))
        }
        InputEvent::PointerMove { kind, x, y } => {
            format!("{} move ({x}, {y})", pointer_name(*kind))
        }
        InputEvent::PointerUp { kind } => format!("{} up", pointer_name(*kind)),
    }
}

fn pointer_name(kind: PointerKind) -> &'static str {
    match kind {
        PointerKind::Mouse => "mouse",
        PointerKind::Touch => "touch",
    }
}

fn describe_target(target: &ClickTarget) -> String {
    match target {
        ClickTarget::Thumbnail(index) => format!("thumbnail #{}", index + 1),
        ClickTarget::Close => "close".to_string(),
        ClickTarget::Backdrop => "backdrop".to_string(),
        ClickTarget::Previous => "previous".to_string(),
        ClickTarget::Next => "next".to_string(),
        ClickTarget::ZoomIn => "zoom in".to_string(),
        ClickTarget::ZoomOut => "zoom out".to_string(),
        ClickTarget::ZoomReset => "zoom reset".to_string(),
        ClickTarget::Image => "image".to_string(),
        ClickTarget::Other => "elsewhere".to_string(),
    }
}

fn describe_op(op: &SurfaceOp) -> String {
    match op {
        SurfaceOp::MarkClickable { index } => format!("mark clickable #{}", index + 1),
        SurfaceOp::ShowOverlay => "show overlay".to_string(),
        SurfaceOp::HideOverlay => "hide overlay".to_string(),
        SurfaceOp::SetImageSource { url } => format!("source {}", url),
        SurfaceOp::ApplyTransform { css, zoomed } => {
            if *zoomed {
                format!("transform {} (zoomed)", css)
            } else {
                format!("transform {}", css)
            }
        }
        SurfaceOp::SetScrollLocked { locked: true } => "lock scroll".to_string(),
        SurfaceOp::SetScrollLocked { locked: false } => "unlock scroll".to_string(),
        SurfaceOp::SetNavigationVisible { visible: true } => "show navigation".to_string(),
        SurfaceOp::SetNavigationVisible { visible: false } => "hide navigation".to_string(),
    }
}

fn step_header(pos: usize, step: &TraceStep) -> String {
    let state = match (step.open, step.index) {
        (true, Some(index)) => format!("open #{}, zoom {:.2}", index + 1, step.zoom),
        _ => "closed".to_string(),
    };
    let mut line = format!(
        "{} {} → {}",
        format_index(pos),
        describe_event(&step.event),
        state
    );
    if step.outcome.prevent_default {
        line.push_str(" [default prevented]");
    }
    line
}

/// Format a replay trace: one header line per event, surface calls indented.
pub fn format_replay(replay: &Replay) -> Vec<String> {
    let mut lines = Vec::new();
    let noun = if replay.gallery_len == 1 { "image" } else { "images" };
    lines.push(format!("Gallery: {} {}", replay.gallery_len, noun));
    for op in &replay.scan_ops {
        lines.push(format!("{}{}", indent(1), describe_op(op)));
    }
    for (i, step) in replay.steps.iter().enumerate() {
        lines.push(step_header(i + 1, step));
        for op in &step.ops {
            lines.push(format!("{}{}", indent(1), describe_op(op)));
        }
    }
    lines
}

pub fn print_replay(replay: &Replay) {
    for line in format_replay(replay) {
        println!("{}", line);
    }
}

/// Format the source resolution for one image, marking the winner.
pub fn format_resolve(image: &ImageCandidate) -> Vec<String> {
    let mut lines = vec![image.src.clone()];
    let best = image.best_source();
    let mut marked = false;
    for candidate in &image.alternatives {
        let arrow = if !marked && candidate.url == best {
            marked = true;
            " ←"
        } else {
            ""
        };
        lines.push(format!(
            "{}{}w {}{}",
            indent(1),
            candidate.width,
            candidate.url,
            arrow
        ));
    }
    lines.push(format!("Resolved: {}", best));
    lines
}

pub fn print_resolve(image: &ImageCandidate) {
    for line in format_resolve(image) {
        println!("{}", line);
    }
}
