//! Recorded interaction sessions.
//!
//! A session is a JSON file with the images a page reported and a sequence
//! of input events:
//!
//! ```json
//! {
//!   "images": [
//!     {"src": "dawn.jpg", "srcset": "dawn-800.jpg 800w", "natural_width": 1600, "natural_height": 1200},
//!     {"src": "icon.png", "natural_width": 24, "natural_height": 24}
//!   ],
//!   "events": [
//!     {"type": "click", "target": {"thumbnail": 0}},
//!     {"type": "wheel", "delta_y": -100, "modifiers": {"ctrl": true}},
//!     {"type": "key", "key": "Escape"}
//!   ]
//! }
//! ```
//!
//! [`replay`] runs it through a [`Lightbox`] backed by a
//! [`RecordingSurface`] and returns one [`TraceStep`] per event, which makes
//! it easy to see exactly what the widget would do to a page.

use crate::config::LightboxConfig;
use crate::controller::Lightbox;
use crate::gallery::ImageElement;
use crate::input::{EventOutcome, InputEvent};
use crate::surface::{RecordingSurface, SurfaceOp};
use crate::viewer::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Session {
    pub images: Vec<ImageElement>,
    #[serde(default)]
    pub events: Vec<InputEvent>,
}

pub fn load_session(path: &Path) -> Result<Session, SessionError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Controller state after one event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraceStep {
    pub event: InputEvent,
    pub outcome: EventOutcome,
    pub open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub zoom: f64,
    pub offset: Point,
    pub ops: Vec<SurfaceOp>,
}

/// Result of replaying a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Replay {
    /// Gallery size after the initial scan.
    pub gallery_len: usize,
    /// Surface calls made by the initial scan.
    pub scan_ops: Vec<SurfaceOp>,
    pub steps: Vec<TraceStep>,
}

/// Scan the session's images, then feed its events one at a time.
pub fn replay(session: &Session, config: &LightboxConfig) -> Replay {
    let mut lightbox = Lightbox::new(config.clone(), RecordingSurface::new());
    lightbox.scan(&session.images);
    let scan_ops = lightbox.surface_mut().drain();

    let steps = session
        .events
        .iter()
        .map(|&event| {
            let outcome = lightbox.handle(event);
            let viewer = lightbox.viewer();
            TraceStep {
                event,
                outcome,
                open: lightbox.is_open(),
                index: viewer.map(|v| v.index()),
                zoom: viewer.map(|v| v.zoom()).unwrap_or(1.0),
                offset: viewer.map(|v| v.offset()).unwrap_or_default(),
                ops: lightbox.surface_mut().drain(),
            }
        })
        .collect();

    Replay {
        gallery_len: lightbox.gallery().len(),
        scan_ops,
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ClickTarget, Key};
    use tempfile::TempDir;

    const SESSION: &str = r#"{
        "images": [
            {"src": "a.jpg", "srcset": "a-100.jpg 100w, a-400.jpg 400w, a-800.jpg 800w",
             "natural_width": 1600, "natural_height": 1200},
            {"src": "icon.png", "natural_width": 24, "natural_height": 24},
            {"src": "b.jpg", "natural_width": 640, "natural_height": 480}
        ],
        "events": [
            {"type": "click", "target": {"thumbnail": 0}},
            {"type": "wheel", "delta_y": -100, "modifiers": {"ctrl": true}},
            {"type": "key", "key": "ArrowRight"},
            {"type": "key", "key": "ArrowRight"},
            {"type": "key", "key": "Escape"}
        ]
    }"#;

    fn session() -> Session {
        serde_json::from_str(SESSION).unwrap()
    }

    #[test]
    fn load_session_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, SESSION).unwrap();

        let session = load_session(&path).unwrap();
        assert_eq!(session.images.len(), 3);
        assert_eq!(session.events.len(), 5);
        assert_eq!(
            session.events[0],
            InputEvent::click(ClickTarget::Thumbnail(0))
        );
    }

    #[test]
    fn load_session_rejects_bad_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_session(&path), Err(SessionError::Json(_))));
    }

    #[test]
    fn load_session_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_session(&tmp.path().join("nope.json"));
        assert!(matches!(result, Err(SessionError::Io(_))));
    }

    #[test]
    fn replay_traces_each_event() {
        let replay = replay(&session(), &LightboxConfig::default());

        assert_eq!(replay.gallery_len, 2);
        assert_eq!(replay.scan_ops.len(), 2);
        assert_eq!(replay.steps.len(), 5);

        let opened = &replay.steps[0];
        assert!(opened.open);
        assert_eq!(opened.index, Some(0));
        assert!(opened.ops.contains(&SurfaceOp::SetImageSource {
            url: "a-800.jpg".into()
        }));

        let zoomed = &replay.steps[1];
        assert_eq!(zoomed.zoom, 1.1);
        assert!(zoomed.outcome.prevent_default);

        // Navigation resets the zoom
        assert_eq!(replay.steps[2].index, Some(1));
        assert_eq!(replay.steps[2].zoom, 1.0);
        // and wraps
        assert_eq!(replay.steps[3].index, Some(0));

        let closed = &replay.steps[4];
        assert_eq!(closed.event, InputEvent::key(Key::Escape));
        assert!(!closed.open);
    }

    #[test]
    fn replay_without_events_only_scans() {
        let session = Session {
            images: vec![ImageElement::new("a.jpg", 500, 500)],
            events: vec![],
        };
        let replay = replay(&session, &LightboxConfig::default());
        assert_eq!(replay.gallery_len, 1);
        assert!(replay.steps.is_empty());
    }
}
