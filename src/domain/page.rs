use serde::{Deserialize, Serialize};

/// One physical page of a source document. Page numbers are 0-based
/// internally; presentation adds 1 for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub text: String,
    pub source: String,
    pub number: u32,
}

impl Page {
    pub fn new(text: impl Into<String>, source: impl Into<String>, number: u32) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            number,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
