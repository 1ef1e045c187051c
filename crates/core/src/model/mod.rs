mod chapter;
mod course;
pub mod document;
mod ids;
mod lesson;

pub use chapter::{Chapter, ChapterError};
pub use course::{Course, CourseError};
pub use document::{ChapterDocument, CourseDocument, LessonDocument};
pub use ids::{CourseId, ParseIdError};
pub use lesson::{Lesson, LessonContent, LessonError, LessonKind};
