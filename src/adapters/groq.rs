//! Answer synthesis via an OpenAI-compatible chat completions endpoint.
//!
//! Defaults target Groq. The prompt instructs the model to answer only from
//! the supplied context and to say so when the context does not contain the
//! answer; the response text is passed through to the caller unaltered.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SynthesizerConfig;
use crate::error::{DocqaError, Result};
use crate::ports::AnswerSynthesizer;

pub struct GroqSynthesizer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GroqSynthesizer {
    pub fn new(config: &SynthesizerConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            DocqaError::Config(
                "synthesizer API key not set; export GROQ_API_KEY or set synthesizer.api_key"
                    .to_string(),
            )
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a senior analyst with expertise in analyzing documents.\n\
         Analyze the provided context carefully and answer the question in detail.\n\
         If you find relevant information, explain it thoroughly with specific figures and details.\n\
         If the answer is not in the context, say \"I cannot find that information in the documents.\"\n\
         \n\
         CONTEXT:\n\
         {context}\n\
         \n\
         QUESTION: {question}\n\
         \n\
         DETAILED ANSWER:"
    )
}

#[async_trait]
impl AnswerSynthesizer for GroqSynthesizer {
    async fn synthesize(&self, context: &str, question: &str) -> Result<String> {
        let body = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: &build_prompt(context, question),
            }],
        };

        debug!(model = %self.model, "requesting answer synthesis");
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let detail = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(DocqaError::Synthesis(format!("{status}: {detail}")));
        }

        let parsed: ChatResponse = resp.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DocqaError::Synthesis("response contained no choices".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = build_prompt("retrieved text here", "what is revenue?");
        assert!(prompt.contains("CONTEXT:\nretrieved text here"));
        assert!(prompt.contains("QUESTION: what is revenue?"));
        assert!(prompt.ends_with("DETAILED ANSWER:"));
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = SynthesizerConfig {
            api_key: None,
            ..SynthesizerConfig::default()
        };
        assert!(matches!(
            GroqSynthesizer::new(&config),
            Err(DocqaError::Config(_))
        ));
    }
}
