use thiserror::Error;

use crate::model::{
    DEFAULT_EXCLUSION_LIMIT, ExclusionList, LearnedSet, ProficiencyLevel, WordEntry, WorkingBatch,
};
use crate::progress::{CourseProgress, DEFAULT_GOAL};

/// Number of new words requested per batch.
pub const DEFAULT_BATCH_SIZE: usize = 10;

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseSettingsError {
    #[error("goal must be > 0")]
    InvalidGoal,

    #[error("batch size must be > 0")]
    InvalidBatchSize,
}

/// Knobs for a vocabulary course, passed in explicitly by whoever builds the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseSettings {
    goal: usize,
    batch_size: usize,
    exclusion_limit: usize,
}

impl CourseSettings {
    /// # Errors
    ///
    /// Returns `CourseSettingsError` if `goal` or `batch_size` is zero.
    pub fn new(
        goal: usize,
        batch_size: usize,
        exclusion_limit: usize,
    ) -> Result<Self, CourseSettingsError> {
        if goal == 0 {
            return Err(CourseSettingsError::InvalidGoal);
        }
        if batch_size == 0 {
            return Err(CourseSettingsError::InvalidBatchSize);
        }
        Ok(Self {
            goal,
            batch_size,
            exclusion_limit,
        })
    }

    #[must_use]
    pub fn goal(&self) -> usize {
        self.goal
    }

    #[must_use]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[must_use]
    pub fn exclusion_limit(&self) -> usize {
        self.exclusion_limit
    }
}

impl Default for CourseSettings {
    fn default() -> Self {
        Self {
            goal: DEFAULT_GOAL,
            batch_size: DEFAULT_BATCH_SIZE,
            exclusion_limit: DEFAULT_EXCLUSION_LIMIT,
        }
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Logical state of the course as seen by a display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseState {
    /// No working batch and nothing loading; the learner is offered more words.
    Idle,
    /// A batch fetch is in flight.
    Loading,
    /// A non-empty working batch is on display.
    Ready,
}

/// Identifies one in-flight fetch so late or stale results can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Everything a word generator needs to produce the next batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRequest {
    pub ticket: FetchTicket,
    pub level: ProficiencyLevel,
    pub desired_count: usize,
    pub exclusions: ExclusionList,
}

/// Result of applying a fetched batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// The batch replaced the working set; `accepted` entries remain after filtering.
    Applied { accepted: usize },
    /// The ticket no longer matches the in-flight fetch; nothing changed.
    Discarded,
}

/// Result of marking a word learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    /// Moved from the working batch into the learned set.
    Learned,
    /// Already learned; the learned set is unchanged.
    AlreadyLearned,
    /// Not in the working batch; nothing changed.
    NotInBatch,
}

impl MarkOutcome {
    /// Whether the learned set changed and must be persisted.
    #[must_use]
    pub fn changed_learned(self) -> bool {
        matches!(self, MarkOutcome::Learned)
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingFetch {
    ticket: FetchTicket,
    desired_count: usize,
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// In-memory vocabulary course: the learned set, the working batch, and fetch bookkeeping.
///
/// Pure and synchronous; I/O lives in the services layer.
#[derive(Debug, Clone)]
pub struct Course {
    settings: CourseSettings,
    learned: LearnedSet,
    batch: WorkingBatch,
    pending: Option<PendingFetch>,
    next_ticket: u64,
    last_error: Option<String>,
}

impl Course {
    #[must_use]
    pub fn new(settings: CourseSettings, learned: LearnedSet) -> Self {
        Self {
            settings,
            learned,
            batch: WorkingBatch::default(),
            pending: None,
            next_ticket: 1,
            last_error: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> CourseState {
        if self.pending.is_some() {
            CourseState::Loading
        } else if self.batch.is_empty() {
            CourseState::Idle
        } else {
            CourseState::Ready
        }
    }

    #[must_use]
    pub fn learned(&self) -> &LearnedSet {
        &self.learned
    }

    #[must_use]
    pub fn batch(&self) -> &WorkingBatch {
        &self.batch
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn progress(&self) -> CourseProgress {
        CourseProgress::new(self.learned.len(), self.settings.goal())
    }

    /// Start a fetch for the given level.
    ///
    /// Returns `None` when a fetch is already in flight; at most one is outstanding.
    pub fn begin_fetch(&mut self, level: ProficiencyLevel) -> Option<BatchRequest> {
        if self.pending.is_some() {
            return None;
        }

        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        let desired_count = self.settings.batch_size();
        self.pending = Some(PendingFetch {
            ticket,
            desired_count,
        });
        self.last_error = None;

        Some(BatchRequest {
            ticket,
            level,
            desired_count,
            exclusions: ExclusionList::from_learned(&self.learned, self.settings.exclusion_limit()),
        })
    }

    /// Apply a successful fetch.
    ///
    /// The batch is truncated to the requested size and words already learned are dropped,
    /// so no word is ever in both the batch and the learned set.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        mut entries: Vec<WordEntry>,
    ) -> BatchOutcome {
        let Some(pending) = self.take_pending(ticket) else {
            return BatchOutcome::Discarded;
        };

        entries.truncate(pending.desired_count);
        entries.retain(|entry| !self.learned.contains(entry.word()));
        let accepted = entries.len();
        self.batch = WorkingBatch::new(entries);
        BatchOutcome::Applied { accepted }
    }

    /// Record a failed fetch. Learned set and working batch are left as they were.
    ///
    /// Returns `false` if the ticket is stale and the failure was ignored.
    pub fn fail_fetch(&mut self, ticket: FetchTicket, message: impl Into<String>) -> bool {
        if self.take_pending(ticket).is_none() {
            return false;
        }
        self.last_error = Some(message.into());
        true
    }

    /// Forget the in-flight fetch; its result will be discarded when it arrives.
    pub fn abandon_fetch(&mut self) {
        self.pending = None;
    }

    /// Forget the fetch identified by `ticket` if it is still in flight.
    pub fn cancel_fetch(&mut self, ticket: FetchTicket) -> bool {
        self.take_pending(ticket).is_some()
    }

    /// Move `word` from the working batch into the learned set.
    pub fn mark_learned(&mut self, word: &str) -> MarkOutcome {
        if self.learned.contains(word) {
            self.batch.take(word);
            return MarkOutcome::AlreadyLearned;
        }

        match self.batch.take(word) {
            Some(entry) => {
                self.learned.push(entry);
                MarkOutcome::Learned
            }
            None => MarkOutcome::NotInBatch,
        }
    }

    fn take_pending(&mut self, ticket: FetchTicket) -> Option<PendingFetch> {
        match self.pending {
            Some(pending) if pending.ticket == ticket => self.pending.take(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> WordEntry {
        WordEntry::new(word, "/x/", format!("meaning of {word}"), vec![]).unwrap()
    }

    fn words(entries: &[WordEntry]) -> Vec<&str> {
        entries.iter().map(WordEntry::word).collect()
    }

    fn ready_course(batch: &[&str]) -> Course {
        let mut course = Course::new(CourseSettings::default(), LearnedSet::new());
        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        course.complete_fetch(request.ticket, batch.iter().map(|w| entry(w)).collect());
        course
    }

    #[test]
    fn settings_reject_zero_goal_and_batch() {
        assert_eq!(
            CourseSettings::new(0, 10, 200).unwrap_err(),
            CourseSettingsError::InvalidGoal
        );
        assert_eq!(
            CourseSettings::new(2000, 0, 200).unwrap_err(),
            CourseSettingsError::InvalidBatchSize
        );
    }

    #[test]
    fn starts_idle_and_moves_through_loading_to_ready() {
        let mut course = Course::new(CourseSettings::default(), LearnedSet::new());
        assert_eq!(course.state(), CourseState::Idle);

        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        assert_eq!(course.state(), CourseState::Loading);
        assert_eq!(request.desired_count, 10);
        assert!(request.exclusions.is_empty());

        let batch = (0..10).map(|i| entry(&format!("w{i}"))).collect();
        let outcome = course.complete_fetch(request.ticket, batch);
        assert_eq!(outcome, BatchOutcome::Applied { accepted: 10 });
        assert_eq!(course.state(), CourseState::Ready);
        assert_eq!(course.batch().len(), 10);
        assert!(course.learned().is_empty());
    }

    #[test]
    fn second_fetch_while_loading_is_rejected() {
        let mut course = Course::new(CourseSettings::default(), LearnedSet::new());
        assert!(course.begin_fetch(ProficiencyLevel::B1).is_some());
        assert!(course.begin_fetch(ProficiencyLevel::B1).is_none());
    }

    #[test]
    fn empty_batch_returns_to_idle() {
        let mut course = Course::new(CourseSettings::default(), LearnedSet::new());
        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        course.complete_fetch(request.ticket, vec![]);
        assert_eq!(course.state(), CourseState::Idle);
    }

    #[test]
    fn oversized_batch_is_truncated() {
        let settings = CourseSettings::new(2000, 3, 200).unwrap();
        let mut course = Course::new(settings, LearnedSet::new());
        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        let outcome = course.complete_fetch(
            request.ticket,
            ["a", "b", "c", "d", "e"].iter().map(|w| entry(w)).collect(),
        );
        assert_eq!(outcome, BatchOutcome::Applied { accepted: 3 });
        assert_eq!(words(course.batch().entries()), ["a", "b", "c"]);
    }

    #[test]
    fn already_learned_words_are_filtered_from_new_batch() {
        let learned = LearnedSet::from_entries([entry("old")]);
        let mut course = Course::new(CourseSettings::default(), learned);
        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        course.complete_fetch(request.ticket, vec![entry("old"), entry("new"), entry("new")]);
        assert_eq!(words(course.batch().entries()), ["new", "new"]);
    }

    #[test]
    fn failed_fetch_keeps_state_and_sets_error() {
        let mut course = ready_course(&["A", "B"]);
        course.mark_learned("A");
        let before_learned = course.learned().clone();
        let before_batch = course.batch().clone();

        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        assert!(course.fail_fetch(request.ticket, "network down"));

        assert!(!course.is_loading());
        assert_eq!(course.last_error(), Some("network down"));
        assert_eq!(course.learned(), &before_learned);
        assert_eq!(course.batch(), &before_batch);
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut course = Course::new(CourseSettings::default(), LearnedSet::new());
        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        course.abandon_fetch();

        assert_eq!(
            course.complete_fetch(request.ticket, vec![entry("late")]),
            BatchOutcome::Discarded
        );
        assert!(!course.fail_fetch(request.ticket, "late failure"));
        assert!(course.batch().is_empty());
        assert!(course.last_error().is_none());
    }

    #[test]
    fn begin_fetch_clears_previous_error() {
        let mut course = Course::new(CourseSettings::default(), LearnedSet::new());
        let request = course.begin_fetch(ProficiencyLevel::B2).unwrap();
        course.fail_fetch(request.ticket, "boom");
        course.begin_fetch(ProficiencyLevel::B2).unwrap();
        assert!(course.last_error().is_none());
    }

    #[test]
    fn mark_learned_moves_word_out_of_batch() {
        let mut course = ready_course(&["A", "B", "C"]);
        assert_eq!(course.mark_learned("B"), MarkOutcome::Learned);
        assert_eq!(words(course.batch().entries()), ["A", "C"]);
        assert_eq!(words(course.learned().entries()), ["B"]);
        assert_eq!(course.state(), CourseState::Ready);
    }

    #[test]
    fn marking_last_word_returns_to_idle() {
        let mut course = ready_course(&["A"]);
        course.mark_learned("A");
        assert_eq!(course.state(), CourseState::Idle);
    }

    #[test]
    fn duplicate_mark_is_a_no_op() {
        let mut course = ready_course(&["A", "B"]);
        assert_eq!(course.mark_learned("A"), MarkOutcome::Learned);
        assert_eq!(course.mark_learned("A"), MarkOutcome::AlreadyLearned);
        assert_eq!(course.learned().len(), 1);
        assert!(!MarkOutcome::AlreadyLearned.changed_learned());
    }

    #[test]
    fn marking_unknown_word_changes_nothing() {
        let mut course = ready_course(&["A"]);
        assert_eq!(course.mark_learned("Z"), MarkOutcome::NotInBatch);
        assert!(course.learned().is_empty());
        assert_eq!(course.batch().len(), 1);
    }

    #[test]
    fn learned_and_batch_stay_disjoint_across_marks() {
        let mut course = ready_course(&["A", "B", "A", "C", "B"]);
        for word in ["B", "A", "B", "Z", "C", "A"] {
            course.mark_learned(word);
            for entry in course.batch().entries() {
                assert!(!course.learned().contains(entry.word()));
            }
            let mut seen = std::collections::HashSet::new();
            assert!(course.learned().words().all(|w| seen.insert(w)));
        }
        assert_eq!(words(course.learned().entries()), ["B", "A", "C"]);
        assert_eq!(course.state(), CourseState::Idle);
    }

    #[test]
    fn progress_tracks_learned_count() {
        let mut course = ready_course(&["A", "B"]);
        course.mark_learned("A");
        let progress = course.progress();
        assert_eq!(progress.learned, 1);
        assert_eq!(progress.goal, DEFAULT_GOAL);
    }
}
