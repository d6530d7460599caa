pub mod embed;
pub mod extract;
pub mod index;
pub mod synthesize;

pub use embed::EmbeddingGenerator;
pub use extract::PageSource;
pub use index::{IndexReader, IndexWriter};
pub use synthesize::AnswerSynthesizer;
