use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocqaError {
    #[error("Document not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot parse document {path}: {reason}")]
    CorruptDocument { path: PathBuf, reason: String },

    #[error("Document {0} contains no extractable text")]
    EmptyDocument(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("No index at {0}, run `docqa ingest` first")]
    IndexNotFound(PathBuf),

    #[error("Index corrupted: {0}")]
    CorruptIndex(String),

    #[error("Index was built with embedding model '{indexed}' but '{configured}' is configured")]
    ModelMismatch { indexed: String, configured: String },

    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Index error: {0}")]
    Index(#[from] lancedb::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),
}

impl DocqaError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) | Self::EmptyDocument(_) => 1,
            Self::CorruptDocument { .. } => 2,
            Self::Config(_) => 3,
            Self::Embedding(_) | Self::Synthesis(_) => 4,
            Self::IndexNotFound(_) | Self::CorruptIndex(_) => 5,
            Self::ModelMismatch { .. } => 6,
            Self::Io(_) | Self::Serialization(_) | Self::Http(_) | Self::Index(_) | Self::Arrow(_) => 10,
        }
    }
}

pub type Result<T> = std::result::Result<T, DocqaError>;
