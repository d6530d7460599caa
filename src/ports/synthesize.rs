use async_trait::async_trait;

use crate::error::Result;

/// External collaborator that turns retrieved context plus a question into
/// free-form answer text. The core assembles `context` from retrieved
/// segments in rank order and passes the answer through unaltered.
#[async_trait]
pub trait AnswerSynthesizer: Send + Sync {
    async fn synthesize(&self, context: &str, question: &str) -> Result<String>;
}
