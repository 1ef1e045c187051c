#![forbid(unsafe_code)]

pub mod app_services;
pub mod catalog;
pub mod completion;
pub mod error;
pub mod player;
pub mod provider;
pub mod remote;

pub use course_core::Clock;

pub use app_services::AppServices;
pub use catalog::{CatalogService, CourseListItem};
pub use completion::CompletionService;
pub use error::{AppServicesError, CatalogError, CompletionError, LoadError};
pub use player::{
    ChapterOutline, CoursePlayer, LessonOutline, LessonView, LoadOutcome, LoadState, LoadTicket,
    PlayerSession, PlayerSnapshot, PlayerView,
};
pub use provider::{CourseProvider, RepositoryCourseProvider};
pub use remote::{HttpCourseProvider, HttpProviderConfig};
