/// Target number of learned words for the vocabulary course.
pub const DEFAULT_GOAL: usize = 2000;

/// Completion of the course relative to its goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseProgress {
    pub learned: usize,
    pub goal: usize,
}

impl CourseProgress {
    #[must_use]
    pub fn new(learned: usize, goal: usize) -> Self {
        Self { learned, goal }
    }

    /// Completion ratio in `[0.0, 1.0]`, clamped once the goal is reached.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.goal == 0 {
            return 1.0;
        }
        (self.learned as f64 / self.goal as f64).min(1.0)
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        self.ratio() * 100.0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.learned >= self.goal
    }

    /// Words still needed to reach the goal.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.goal.saturating_sub(self.learned)
    }
}
