pub mod embedder;
pub mod groq;
pub mod lance;
pub mod pdf;

pub use embedder::FastEmbedder;
pub use groq::GroqSynthesizer;
pub use lance::{LanceReader, LanceWriter};
pub use pdf::PdfPageSource;
