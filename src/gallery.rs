//! Gallery capture.
//!
//! The page reports every `<img>` under the content container as an
//! [`ImageElement`]. [`scan`] keeps the ones big enough to be worth enlarging
//! and turns them into [`ImageCandidate`]s, in document order. Small images are
//! almost always icons, badges or avatars, so both natural dimensions must
//! exceed the configured minimum.
//!
//! A [`Gallery`] is read-only after capture. Rescanning builds a new one.

use crate::srcset::{self, SourceCandidate};
use serde::{Deserialize, Serialize};

/// An `<img>` as seen on the page at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageElement {
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ImageElement {
    pub fn new(src: impl Into<String>, natural_width: u32, natural_height: u32) -> Self {
        Self {
            src: src.into(),
            srcset: None,
            natural_width,
            natural_height,
        }
    }

    pub fn with_srcset(mut self, srcset: impl Into<String>) -> Self {
        self.srcset = Some(srcset.into());
        self
    }

    /// Strictly larger than `min_dimension` on both axes.
    pub fn qualifies(&self, min_dimension: u32) -> bool {
        self.natural_width > min_dimension && self.natural_height > min_dimension
    }
}

/// A gallery entry: the displayed source plus any responsive alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageCandidate {
    pub src: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<SourceCandidate>,
}

impl ImageCandidate {
    pub fn new(src: impl Into<String>, alternatives: Vec<SourceCandidate>) -> Self {
        Self {
            src: src.into(),
            alternatives,
        }
    }

    /// The source to show in the lightbox: the widest alternative, or the
    /// primary `src` when there are none.
    pub fn best_source(&self) -> &str {
        srcset::widest(&self.alternatives)
            .map(|c| c.url.as_str())
            .unwrap_or(&self.src)
    }
}

impl From<&ImageElement> for ImageCandidate {
    fn from(element: &ImageElement) -> Self {
        let alternatives = element
            .srcset
            .as_deref()
            .map(srcset::parse_srcset)
            .unwrap_or_default();
        Self::new(element.src.clone(), alternatives)
    }
}

/// Ordered images eligible for the lightbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Gallery {
    images: Vec<ImageCandidate>,
}

impl Gallery {
    pub fn new(images: Vec<ImageCandidate>) -> Self {
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageCandidate> {
        self.images.get(index)
    }

    /// Whether navigation between images makes sense.
    pub fn is_navigable(&self) -> bool {
        self.images.len() > 1
    }

    /// Index after `index`, wrapping to the start.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        if !self.is_navigable() {
            return None;
        }
        Some((index + 1) % self.images.len())
    }

    /// Index before `index`, wrapping to the end.
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        if !self.is_navigable() {
            return None;
        }
        let len = self.images.len();
        Some((index + len - 1) % len)
    }
}

/// Build a gallery from the page's images.
///
/// Returns the gallery together with the positions (in `elements`) of the
/// images that made it in, so the caller can attach click handlers to the
/// right elements.
pub fn scan(elements: &[ImageElement], min_dimension: u32) -> (Gallery, Vec<usize>) {
    let (positions, images): (Vec<usize>, Vec<ImageCandidate>) = elements
        .iter()
        .enumerate()
        .filter(|(_, element)| element.qualifies(min_dimension))
        .map(|(pos, element)| (pos, ImageCandidate::from(element)))
        .unzip();
    (Gallery::new(images), positions)
}
