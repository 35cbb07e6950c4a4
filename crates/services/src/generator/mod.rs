//! Word batch generation: the fetcher seam and its hosted-model implementation.

mod config;
mod gemini;
mod prompt;

use async_trait::async_trait;
use lingo_core::model::{ProficiencyLevel, WordEntry};

pub use crate::error::GeneratorError;
pub use config::GeneratorConfig;
pub use gemini::GeminiWordGenerator;

/// Produces batches of vocabulary the learner has not seen yet.
#[async_trait]
pub trait WordBatchFetcher: Send + Sync {
    /// Request up to `desired_count` new words at `level`, avoiding `exclude`.
    ///
    /// Returning fewer words than requested is not an error.
    ///
    /// # Errors
    ///
    /// Returns `GeneratorError` on network, service, or response-shape failures.
    async fn fetch_batch(
        &self,
        level: ProficiencyLevel,
        desired_count: usize,
        exclude: &[String],
    ) -> Result<Vec<WordEntry>, GeneratorError>;
}
