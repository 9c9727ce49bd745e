//! `srcset` attribute parsing.
//!
//! Page images may carry responsive alternatives in the form the site
//! generator emits:
//!
//! ```text
//! dawn-800.avif 800w, dawn-1400.avif 1400w, dawn-2080.avif 2080w
//! ```
//!
//! The lightbox wants the biggest file it can get, so the only descriptor it
//! cares about is the width. Everything here is pure and infallible: entries
//! that cannot be read degrade to width 0 instead of failing the whole list.

use serde::{Deserialize, Serialize};

/// One `(URL, width)` alternative from a `srcset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCandidate {
    pub url: String,
    /// Width descriptor in pixels; 0 when absent or unreadable.
    pub width: u32,
}

impl SourceCandidate {
    pub fn new(url: impl Into<String>, width: u32) -> Self {
        Self {
            url: url.into(),
            width,
        }
    }
}

/// Parse a `srcset` value into its candidates, in document order.
///
/// Entries are comma-separated; each is a URL followed by an optional
/// descriptor. Blank entries are skipped.
///
/// ```
/// # use simple_lightbox::srcset::{parse_srcset, SourceCandidate};
/// let parsed = parse_srcset("a.jpg 400w, b.jpg 800w");
/// assert_eq!(parsed, vec![
///     SourceCandidate::new("a.jpg", 400),
///     SourceCandidate::new("b.jpg", 800),
/// ]);
/// ```
pub fn parse_srcset(value: &str) -> Vec<SourceCandidate> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.split_whitespace();
            let url = parts.next().unwrap_or_default();
            let width = parts.next().map(parse_width).unwrap_or(0);
            SourceCandidate::new(url, width)
        })
        .collect()
}

/// Leading digits of a descriptor (`"800w"` → 800). Anything else is 0.
fn parse_width(descriptor: &str) -> u32 {
    let digits: String = descriptor
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// The widest candidate. Ties keep the earliest entry.
pub fn widest(candidates: &[SourceCandidate]) -> Option<&SourceCandidate> {
    candidates
        .iter()
        .fold(None, |best: Option<&SourceCandidate>, current| match best {
            Some(b) if current.width <= b.width => Some(b),
            _ => Some(current),
        })
}
