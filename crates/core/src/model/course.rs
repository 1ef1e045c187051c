use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::chapter::{Chapter, ChapterError};
use crate::model::ids::CourseId;
use crate::model::lesson::{Lesson, LessonError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Shape and validation failures for a course tree.
///
/// Raised while turning a fetched document into a `Course`; callers treat
/// every variant as a malformed tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course title cannot be empty")]
    EmptyTitle,

    #[error("invalid course document: {0}")]
    InvalidDocument(String),

    #[error("missing required field `{0}`")]
    MissingField(String),

    #[error("chapter {index}: {source}")]
    Chapter { index: usize, source: ChapterError },

    #[error("chapter {chapter}, lesson {lesson}: {source}")]
    Lesson {
        chapter: usize,
        lesson: usize,
        source: LessonError,
    },
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A course tree: ordered chapters, each with ordered lessons.
///
/// The tree is immutable once built. Completion changes go through storage and
/// come back as a freshly fetched `Course`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    instructor: String,
    chapters: Vec<Chapter>,
    updated_at: DateTime<Utc>,
}

impl Course {
    /// Creates a course tree.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::EmptyTitle` if the title is empty or whitespace-only.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        instructor: impl Into<String>,
        chapters: Vec<Chapter>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle);
        }
        Ok(Self {
            id,
            title: title.trim().to_owned(),
            instructor: instructor.into().trim().to_owned(),
            chapters,
            updated_at,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn instructor(&self) -> &str {
        &self.instructor
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    #[must_use]
    pub fn lesson(&self, chapter: usize, lesson: usize) -> Option<&Lesson> {
        self.chapter(chapter).and_then(|c| c.lesson(lesson))
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.chapters.iter().map(Chapter::lesson_count).sum()
    }

    #[must_use]
    pub fn completed_lessons(&self) -> usize {
        self.chapters.iter().map(Chapter::completed_count).sum()
    }

    /// Copy of this course with one lesson swapped out and a new `updated_at`.
    ///
    /// Returns `None` if `(chapter, lesson)` does not name an existing lesson.
    #[must_use]
    pub fn with_lesson(
        &self,
        chapter: usize,
        lesson: usize,
        replacement: Lesson,
        updated_at: DateTime<Utc>,
    ) -> Option<Self> {
        let mut chapters = self.chapters.clone();
        let slot = chapters.get_mut(chapter)?.lesson_mut(lesson)?;
        *slot = replacement;
        Some(Self {
            id: self.id.clone(),
            title: self.title.clone(),
            instructor: self.instructor.clone(),
            chapters,
            updated_at,
        })
    }

    /// Lesson counts per chapter, in order.
    #[must_use]
    pub fn lesson_counts(&self) -> Vec<usize> {
        self.chapters.iter().map(Chapter::lesson_count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonKind;
    use crate::time::fixed_now;

    fn lesson(title: &str, done: bool) -> Lesson {
        Lesson::new(title, LessonKind::Video, "")
            .unwrap()
            .with_completed(done)
    }

    #[test]
    fn course_rejects_blank_title() {
        let err = Course::new(
            CourseId::new("c1").unwrap(),
            "   ",
            "Ada",
            Vec::new(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, CourseError::EmptyTitle);
    }

    #[test]
    fn course_counts_lessons_across_chapters() {
        let chapters = vec![
            Chapter::new("One", "", vec![lesson("a", true), lesson("b", false)]).unwrap(),
            Chapter::new("Two", "", Vec::new()).unwrap(),
            Chapter::new("Three", "", vec![lesson("c", true)]).unwrap(),
        ];
        let course = Course::new(
            CourseId::new("c1").unwrap(),
            " Rust ",
            " Ada ",
            chapters,
            fixed_now(),
        )
        .unwrap();

        assert_eq!(course.title(), "Rust");
        assert_eq!(course.instructor(), "Ada");
        assert_eq!(course.chapter_count(), 3);
        assert_eq!(course.total_lessons(), 3);
        assert_eq!(course.completed_lessons(), 2);
        assert_eq!(course.lesson_counts(), vec![2, 0, 1]);
        assert_eq!(course.lesson(2, 0).map(Lesson::title), Some("c"));
        assert_eq!(course.lesson(1, 0), None);
    }

    #[test]
    fn with_lesson_replaces_only_the_target() {
        let chapters =
            vec![Chapter::new("One", "", vec![lesson("a", false), lesson("b", false)]).unwrap()];
        let course =
            Course::new(CourseId::new("c1").unwrap(), "T", "", chapters, fixed_now()).unwrap();
        let later = fixed_now() + chrono::Duration::minutes(1);

        let updated = course.with_lesson(0, 1, lesson("b", true), later).unwrap();
        assert_eq!(updated.completed_lessons(), 1);
        assert!(updated.lesson(0, 1).unwrap().is_completed());
        assert_eq!(updated.updated_at(), later);
        assert_eq!(course.completed_lessons(), 0);

        assert!(course.with_lesson(0, 2, lesson("c", true), later).is_none());
        assert!(course.with_lesson(1, 0, lesson("c", true), later).is_none());
    }

    #[test]
    fn error_messages_name_the_position() {
        let err = CourseError::Lesson {
            chapter: 1,
            lesson: 3,
            source: LessonError::EmptyTitle,
        };
        assert_eq!(
            err.to_string(),
            "chapter 1, lesson 3: lesson title cannot be empty"
        );
    }
}
