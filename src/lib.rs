//! # docqa
//!
//! Retrieval-augmented question answering over a local PDF corpus.
//!
//! Ingestion extracts one text unit per page, splits the pages into
//! overlapping character windows, embeds each window, and persists the
//! result in a similarity-searchable index. Query time embeds the question
//! with the same model, retrieves the nearest segments, and grounds a
//! language-model answer on them, returning the answer with deduplicated
//! source citations.

pub mod adapters;
pub mod chunker;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{DocqaError, Result};
