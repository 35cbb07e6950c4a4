use lingo_core::model::WordEntry;
use lingo_core::{Course, CourseState};

/// Presentation-agnostic snapshot of a course for rendering.
///
/// No pre-formatted strings; the front-end decides how to show numbers and errors.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseView {
    pub state: CourseState,
    pub learned_count: usize,
    pub goal: usize,
    pub progress: f64,
    pub percent_complete: f64,
    pub batch: Vec<WordEntry>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CourseView {
    #[must_use]
    pub fn from_course(course: &Course) -> Self {
        let progress = course.progress();
        Self {
            state: course.state(),
            learned_count: progress.learned,
            goal: progress.goal,
            progress: progress.ratio(),
            percent_complete: progress.percent(),
            batch: course.batch().entries().to_vec(),
            is_loading: course.is_loading(),
            error: course.last_error().map(str::to_owned),
        }
    }

    /// Whether the "get more words" prompt should be shown.
    #[must_use]
    pub fn ready_for_more(&self) -> bool {
        self.state == CourseState::Idle && self.error.is_none()
    }

    /// Whether a retry affordance should be shown.
    #[must_use]
    pub fn can_retry(&self) -> bool {
        !self.is_loading && self.error.is_some()
    }
}
