#![forbid(unsafe_code)]

pub mod app_services;
pub mod course_service;
pub mod course_view;
pub mod error;
pub mod generator;

pub use app_services::CourseServices;
pub use course_service::{CourseController, RequestOutcome};
pub use course_view::CourseView;
pub use error::{AppServicesError, CourseError, GeneratorError};
pub use generator::{GeminiWordGenerator, GeneratorConfig, WordBatchFetcher};
