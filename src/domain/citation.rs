use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use super::ScoredSegment;

/// A human-readable pointer back to the source of retrieved text.
///
/// Local files render as `" {filename} (Page {n})"` with a 1-based page;
/// URL-bearing sources render verbatim. The leading space is part of the
/// display contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub display: String,
}

impl Citation {
    fn for_source(source: &str, page: u32) -> Self {
        let display = if source.contains("http") {
            format!(" {source}")
        } else {
            let filename = Path::new(source)
                .file_name()
                .map_or(source, |n| n.to_str().unwrap_or(source));
            format!(" {filename} (Page {})", u64::from(page) + 1)
        };
        Self { display }
    }
}

impl std::fmt::Display for Citation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// Collapse the provenance of retrieved segments into a citation list with
/// no repeated display strings, preserving first-seen (retrieval rank) order.
/// Two segments from the same file and page collapse to one citation even
/// when their text differs.
pub fn reconcile(results: &[ScoredSegment]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();

    for result in results {
        let citation = Citation::for_source(&result.segment.source, result.segment.page);
        if seen.insert(citation.display.clone()) {
            citations.push(citation);
        }
    }

    citations
}
