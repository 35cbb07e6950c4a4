use std::sync::Arc;

use lingo_core::CourseSettings;
use storage::LearnedWordStore;
use storage::repository::Storage;

use crate::course_service::CourseController;
use crate::error::AppServicesError;
use crate::generator::{GeminiWordGenerator, GeneratorConfig, WordBatchFetcher};

/// Assembles app-facing services once at startup.
///
/// The caller owns this value and hands out the controller by handle; nothing is
/// reached through globals.
#[derive(Clone)]
pub struct CourseServices {
    course: Arc<CourseController>,
    generator_enabled: bool,
}

impl CourseServices {
    /// Build services backed by `SQLite` storage and the hosted word generator.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        settings: CourseSettings,
        generator: Option<GeneratorConfig>,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let generator = GeminiWordGenerator::new(generator);
        let generator_enabled = generator.enabled();
        Ok(Self::assemble(storage, Arc::new(generator), settings, generator_enabled).await)
    }

    /// Build services from explicit parts; used by tests and alternative front-ends.
    pub async fn with_parts(
        storage: Storage,
        fetcher: Arc<dyn WordBatchFetcher>,
        settings: CourseSettings,
    ) -> Self {
        Self::assemble(storage, fetcher, settings, true).await
    }

    async fn assemble(
        storage: Storage,
        fetcher: Arc<dyn WordBatchFetcher>,
        settings: CourseSettings,
        generator_enabled: bool,
    ) -> Self {
        let store = LearnedWordStore::new(storage.kv);
        let course = Arc::new(CourseController::load(settings, store, fetcher).await);
        Self {
            course,
            generator_enabled,
        }
    }

    #[must_use]
    pub fn course(&self) -> Arc<CourseController> {
        Arc::clone(&self.course)
    }

    /// Whether the word generator has credentials configured.
    #[must_use]
    pub fn generator_enabled(&self) -> bool {
        self.generator_enabled
    }
}
