// src/service.rs

//! Request-level entry point: refresh the normalized store, look up a student,
//! generate a remark.

use serde::Serialize;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::config::Config;
use crate::normalize::{refresh_normalized, UnifiedRecord};
use crate::remark::{LlmProvider, RemarkError, RemarkGenerator, RemarkResponse};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no record stored for {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RemarkError> for ServiceError {
    fn from(e: RemarkError) -> Self {
        match e {
            RemarkError::InvalidInput(d) => ServiceError::InvalidInput(d),
            RemarkError::GenerationFailed(d) => ServiceError::GenerationFailed(d),
        }
    }
}

/// What a remark request returns: the student as normalized plus the remark.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StudentRemark {
    pub student_detail: UnifiedRecord,
    #[serde(flatten)]
    pub remark: RemarkResponse,
}

pub struct RemarkService<P> {
    config: Config,
    generator: RemarkGenerator<P>,
}

impl<P: LlmProvider> RemarkService<P> {
    pub fn new(config: Config, provider: P) -> Self {
        Self {
            config,
            generator: RemarkGenerator::new(provider),
        }
    }

    /// Generate a remark for `usn` from freshly normalized data.
    #[instrument(level = "info", skip(self))]
    pub async fn remark_for(&self, usn: &str) -> Result<StudentRemark, ServiceError> {
        let normalized =
            refresh_normalized(&self.config.store_path, &self.config.normalized_path).map_err(
                |e| {
                    warn!(error = %format!("{e:#}"), "normalization refresh failed");
                    ServiceError::Internal(format!("{e:#}"))
                },
            )?;

        let record = normalized
            .get(usn)
            .ok_or_else(|| ServiceError::NotFound(usn.to_string()))?;

        let remark = self.generator.generate_remark(record).await?;
        Ok(StudentRemark {
            student_detail: record.clone(),
            remark,
        })
    }
}
