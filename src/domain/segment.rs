use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentId(String);

impl SegmentId {
    pub fn generate() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let hash = blake3::hash(uuid.as_bytes());
        let hex = hex::encode(&hash.as_bytes()[..4]);
        Self(format!("seg-{hex}"))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SegmentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A bounded, possibly overlapping window of a document's text, the unit of
/// embedding and retrieval. Provenance points at the page containing the
/// segment's first character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub text: String,
    pub source: String,
    pub page: u32,
}

impl Segment {
    pub fn new(text: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            id: SegmentId::generate(),
            text: text.into(),
            source: source.into(),
            page,
        }
    }

    /// Segment length in characters, the unit the chunking limits are
    /// expressed in.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
