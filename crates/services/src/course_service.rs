use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lingo_core::model::{LearnedSet, ProficiencyLevel, WordEntry};
use lingo_core::{
    BatchOutcome, Course, CourseProgress, CourseSettings, CourseState, FetchTicket, MarkOutcome,
};
use storage::LearnedWordStore;
use tracing::{debug, info, warn};

use crate::course_view::CourseView;
use crate::error::CourseError;
use crate::generator::WordBatchFetcher;

/// Result of asking for a new batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The batch replaced the working set.
    Applied { accepted: usize },
    /// Another fetch was already in flight; nothing was requested.
    AlreadyLoading,
    /// The fetch finished after it was abandoned; its result was dropped.
    Discarded,
}

/// Orchestrates the vocabulary course: loading learned words, fetching batches,
/// marking words learned, and persisting after every change.
///
/// All course state sits behind one lock that is never held across an await,
/// so a fetch in flight does not block marking words learned.
pub struct CourseController {
    course: Mutex<Course>,
    store: LearnedWordStore,
    fetcher: Arc<dyn WordBatchFetcher>,
    persist_gate: tokio::sync::Mutex<()>,
}

impl CourseController {
    #[must_use]
    pub fn new(
        settings: CourseSettings,
        learned: LearnedSet,
        store: LearnedWordStore,
        fetcher: Arc<dyn WordBatchFetcher>,
    ) -> Self {
        Self {
            course: Mutex::new(Course::new(settings, learned)),
            store,
            fetcher,
            persist_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Build a controller from whatever the store has persisted.
    pub async fn load(
        settings: CourseSettings,
        store: LearnedWordStore,
        fetcher: Arc<dyn WordBatchFetcher>,
    ) -> Self {
        let learned = store.load().await;
        info!(learned = learned.len(), "vocabulary course loaded");
        Self::new(settings, learned, store, fetcher)
    }

    /// Fetch a new working batch at `level`, excluding recently learned words.
    ///
    /// A call made while another fetch is in flight does nothing and returns
    /// `RequestOutcome::AlreadyLoading`. If the returned future is dropped before
    /// completion the fetch is abandoned and the controller goes back to its
    /// previous state.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::FetchFailed` when the generator fails. The learned set
    /// and working batch are unchanged and the error is kept for display.
    pub async fn request_batch(
        &self,
        level: ProficiencyLevel,
    ) -> Result<RequestOutcome, CourseError> {
        let Some(request) = self.lock_course().begin_fetch(level) else {
            debug!(%level, "batch fetch already in flight");
            return Ok(RequestOutcome::AlreadyLoading);
        };

        let mut guard = PendingFetchGuard {
            course: &self.course,
            ticket: Some(request.ticket),
        };
        info!(
            %level,
            desired = request.desired_count,
            excluded = request.exclusions.len(),
            "requesting word batch"
        );

        let result = self
            .fetcher
            .fetch_batch(
                request.level,
                request.desired_count,
                request.exclusions.as_slice(),
            )
            .await;
        guard.disarm();

        match result {
            Ok(entries) => {
                let received = entries.len();
                match self.lock_course().complete_fetch(request.ticket, entries) {
                    BatchOutcome::Applied { accepted } => {
                        debug!(received, accepted, "word batch applied");
                        Ok(RequestOutcome::Applied { accepted })
                    }
                    BatchOutcome::Discarded => {
                        debug!("word batch arrived after fetch was abandoned");
                        Ok(RequestOutcome::Discarded)
                    }
                }
            }
            Err(err) => {
                warn!(error = %err, "word batch fetch failed");
                let message = format!("Failed to fetch a new batch of words: {err}");
                if self.lock_course().fail_fetch(request.ticket, message) {
                    Err(CourseError::FetchFailed(err))
                } else {
                    Ok(RequestOutcome::Discarded)
                }
            }
        }
    }

    /// Move `word` from the working batch into the learned set and persist the set.
    ///
    /// The in-memory transition completes before any I/O, so a slow or stuck save
    /// never delays the next mark. Duplicate marks are no-ops.
    pub async fn mark_learned(&self, word: &str) -> MarkOutcome {
        let outcome = self.lock_course().mark_learned(word);

        match outcome {
            MarkOutcome::Learned => debug!(word, "word marked learned"),
            MarkOutcome::AlreadyLearned => debug!(word, "word already learned"),
            MarkOutcome::NotInBatch => debug!(word, "word not in working batch"),
        }

        if outcome.changed_learned() {
            self.persist_learned().await;
        }
        outcome
    }

    /// Save the learned set as it stands once the previous save has finished.
    ///
    /// The snapshot is taken after the gate is acquired, so the latest set always
    /// lands last.
    async fn persist_learned(&self) {
        let _gate = self.persist_gate.lock().await;
        let learned = self.lock_course().learned().clone();
        self.store.save(&learned).await;
    }

    /// Forget any in-flight fetch so its result is discarded on arrival.
    pub fn abandon_fetch(&self) {
        self.lock_course().abandon_fetch();
    }

    #[must_use]
    pub fn view(&self) -> CourseView {
        CourseView::from_course(&self.lock_course())
    }

    #[must_use]
    pub fn state(&self) -> CourseState {
        self.lock_course().state()
    }

    #[must_use]
    pub fn progress(&self) -> CourseProgress {
        self.lock_course().progress()
    }

    #[must_use]
    pub fn learned(&self) -> LearnedSet {
        self.lock_course().learned().clone()
    }

    /// Learned words, most recently learned first.
    #[must_use]
    pub fn learned_newest_first(&self) -> Vec<WordEntry> {
        self.lock_course().learned().newest_first().cloned().collect()
    }

    #[must_use]
    pub fn batch(&self) -> Vec<WordEntry> {
        self.lock_course().batch().entries().to_vec()
    }

    fn lock_course(&self) -> MutexGuard<'_, Course> {
        self.course.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cancels the pending fetch if the owning future is dropped mid-flight.
struct PendingFetchGuard<'a> {
    course: &'a Mutex<Course>,
    ticket: Option<FetchTicket>,
}

impl PendingFetchGuard<'_> {
    fn disarm(&mut self) {
        self.ticket = None;
    }
}

impl Drop for PendingFetchGuard<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            let mut course = self.course.lock().unwrap_or_else(PoisonError::into_inner);
            if course.cancel_fetch(ticket) {
                debug!("in-flight word batch fetch cancelled");
            }
        }
    }
}
