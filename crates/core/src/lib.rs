#![forbid(unsafe_code)]

pub mod course;
pub mod model;
pub mod progress;

pub use course::{
    BatchOutcome, BatchRequest, Course, CourseSettings, CourseSettingsError, CourseState,
    FetchTicket, MarkOutcome,
};
pub use progress::CourseProgress;
