use std::path::Path;

use crate::domain::Page;
use crate::error::Result;

/// Opens a paginated document and yields one text unit per page, with page
/// provenance. The sequence is finite and eagerly materialized: downstream
/// chunking needs the whole document to manage cross-page overlap.
pub trait PageSource: Send + Sync {
    fn extract(&self, path: &Path) -> Result<Vec<Page>>;
}
