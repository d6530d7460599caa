//! PDF page extraction.
//!
//! `pdf-extract` does the heavy lifting since it handles font encodings far
//! better than walking content streams by hand, but it errors or panics on
//! some malformed files; those fall back to a tolerant lopdf content-stream
//! walk before the document is declared corrupt.

use std::panic;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::Page;
use crate::error::{DocqaError, Result};
use crate::ports::PageSource;

pub struct PdfPageSource;

impl PageSource for PdfPageSource {
    fn extract(&self, path: &Path) -> Result<Vec<Page>> {
        if !path.exists() {
            return Err(DocqaError::NotFound(path.to_path_buf()));
        }

        let source = path.display().to_string();
        let texts = extract_page_texts(path)?;
        debug!(pages = texts.len(), %source, "extracted page text");

        let pages: Vec<Page> = texts
            .into_iter()
            .enumerate()
            .map(|(number, text)| Page::new(text, &source, u32::try_from(number).unwrap_or(u32::MAX)))
            .collect();

        if !pages.iter().any(Page::has_content) {
            return Err(DocqaError::EmptyDocument(path.to_path_buf()));
        }

        Ok(pages)
    }
}

fn extract_page_texts(path: &Path) -> Result<Vec<String>> {
    // catch_unwind because pdf-extract panics on certain malformed fonts
    // rather than returning an error.
    let extracted = panic::catch_unwind(panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_by_pages(path)
    }));

    match extracted {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => {
            warn!(path = %path.display(), error = %e, "pdf-extract failed, trying lopdf fallback");
            extract_via_lopdf(path, &e.to_string())
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(ToString::to_string)
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic in pdf-extract".to_string());
            warn!(path = %path.display(), %reason, "pdf-extract panicked, trying lopdf fallback");
            extract_via_lopdf(path, &reason)
        }
    }
}

/// Tolerant per-page extraction that walks text-showing operators directly.
/// Less accurate for exotic fonts, more forgiving of malformed structure.
fn extract_via_lopdf(path: &Path, primary_reason: &str) -> Result<Vec<String>> {
    use lopdf::Object;

    let doc = lopdf::Document::load(path).map_err(|e| DocqaError::CorruptDocument {
        path: path.to_path_buf(),
        reason: format!("{primary_reason}; lopdf: {e}"),
    })?;

    let mut pages = Vec::new();

    for (_number, page_id) in doc.get_pages() {
        let mut text = String::new();

        if let Ok(content) = doc.get_page_content(page_id) {
            let operations = lopdf::content::Content::decode(&content)
                .map(|c| c.operations)
                .unwrap_or_default();

            for op in operations {
                match op.operator.as_str() {
                    "Tj" => {
                        if let Some(Object::String(bytes, _)) = op.operands.first() {
                            text.push_str(&decode_pdf_string(bytes));
                        }
                    }
                    "TJ" => {
                        if let Some(Object::Array(items)) = op.operands.first() {
                            for item in items {
                                if let Object::String(bytes, _) = item {
                                    text.push_str(&decode_pdf_string(bytes));
                                }
                            }
                        }
                    }
                    // Positioning operators mark line or paragraph breaks.
                    "Td" | "TD" | "T*" | "'" | "\"" => {
                        if !text.ends_with('\n') && !text.ends_with(' ') {
                            text.push(' ');
                        }
                    }
                    "ET" => {
                        if !text.ends_with('\n') {
                            text.push('\n');
                        }
                    }
                    _ => {}
                }
            }
        }

        pages.push(text);
    }

    Ok(pages)
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec())
        .unwrap_or_else(|_| bytes.iter().map(|&b| b as char).collect())
}
