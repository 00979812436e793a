// src/remark/mod.rs

//! Remark generation over a normalized record.

pub mod groq;
pub mod prompt;

pub use groq::GroqProvider;
pub use prompt::build_remark_prompt;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::normalize::UnifiedRecord;

#[derive(Debug, Error)]
pub enum RemarkError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("LLM generation failed: {0}")]
    GenerationFailed(String),
}

/// Raw completion returned by a provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub text: String,
    pub model: String,
    pub tokens_used: u32,
    pub generation_time_ms: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RemarkResponse {
    pub ai_remark: String,
    pub meta: RemarkMeta,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RemarkMeta {
    pub model: String,
    pub tokens_used: u32,
    pub generation_time_ms: u64,
}

/// A text-generation backend.
#[allow(async_fn_in_trait)]
pub trait LlmProvider {
    async fn generate(&self, prompt: &str) -> Result<GeneratedText, RemarkError>;
}

/// Reject records remark generation cannot work with.
pub fn validate_input(record: &UnifiedRecord) -> Result<(), RemarkError> {
    if record.subjects.is_empty() {
        return Err(RemarkError::InvalidInput("subjects required".into()));
    }
    for s in &record.subjects {
        if s.name.trim().is_empty() {
            return Err(RemarkError::InvalidInput(format!(
                "subject {} has no name",
                s.code
            )));
        }
        if s.attendance > 100 {
            return Err(RemarkError::InvalidInput(format!(
                "attendance for {} is {}%",
                s.name, s.attendance
            )));
        }
    }
    Ok(())
}

pub struct RemarkGenerator<P> {
    provider: P,
}

impl<P: LlmProvider> RemarkGenerator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    #[instrument(level = "info", skip_all, fields(usn = %record.usn))]
    pub async fn generate_remark(&self, record: &UnifiedRecord) -> Result<RemarkResponse, RemarkError> {
        validate_input(record)?;
        let prompt = build_remark_prompt(record);
        let out = self.provider.generate(&prompt).await?;
        info!(
            model = %out.model,
            tokens = out.tokens_used,
            ms = out.generation_time_ms,
            "remark generated"
        );
        Ok(RemarkResponse {
            ai_remark: out.text,
            meta: RemarkMeta {
                model: out.model,
                tokens_used: out.tokens_used,
                generation_time_ms: out.generation_time_ms,
            },
        })
    }
}
