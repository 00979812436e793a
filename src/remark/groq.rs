// src/remark/groq.rs

use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error};
use url::Url;

use super::{GeneratedText, LlmProvider, RemarkError};
use crate::config::LlmConfig;

const SYSTEM_PROMPT: &str = "You generate professional academic remarks.";

/// Chat-completions client for Groq's OpenAI-compatible endpoint.
pub struct GroqProvider {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: u32,
}

impl GroqProvider {
    pub fn new(cfg: &LlmConfig) -> Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .ok_or_else(|| anyhow!("GROQ_API_KEY not set in environment"))?;
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("parsing LLM base URL {}", cfg.base_url))?;
        let endpoint = base
            .join("chat/completions")
            .with_context(|| format!("joining chat/completions onto {}", base))?;

        Ok(Self {
            client: Client::new(),
            endpoint,
            api_key,
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn complete(&self, prompt: &str) -> Result<ChatResponse> {
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        debug!(endpoint = %self.endpoint, model = %self.model, "requesting completion");
        Ok(self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.endpoint))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", self.endpoint))?
            .json::<ChatResponse>()
            .await
            .context("decoding completion")?)
    }
}

impl LlmProvider for GroqProvider {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, RemarkError> {
        let start = Instant::now();
        let resp = self.complete(prompt).await.map_err(|e| {
            error!(error = %format!("{e:#}"), "completion failed");
            RemarkError::GenerationFailed(format!("{e:#}"))
        })?;
        let generation_time_ms = start.elapsed().as_millis() as u64;

        let text = resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|t| t.trim().to_string())
            .ok_or_else(|| RemarkError::GenerationFailed("completion had no content".into()))?;

        Ok(GeneratedText {
            text,
            model: self.model.clone(),
            tokens_used: resp.usage.map(|u| u.total_tokens).unwrap_or(0),
            generation_time_ms,
        })
    }
}
