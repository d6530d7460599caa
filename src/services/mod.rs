pub mod ingestion;
pub mod query;

pub use ingestion::IngestionService;
pub use query::QueryService;
