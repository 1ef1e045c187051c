use thiserror::Error;

use crate::model::lesson::Lesson;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter title cannot be empty")]
    EmptyTitle,
}

/// An ordered group of lessons. A chapter with no lessons is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    title: String,
    duration: String,
    lessons: Vec<Lesson>,
}

impl Chapter {
    /// Creates a chapter.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` if the title is empty or whitespace-only.
    pub fn new(
        title: impl Into<String>,
        duration: impl Into<String>,
        lessons: Vec<Lesson>,
    ) -> Result<Self, ChapterError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChapterError::EmptyTitle);
        }
        Ok(Self {
            title: title.trim().to_owned(),
            duration: duration.into().trim().to_owned(),
            lessons,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    #[must_use]
    pub fn lesson(&self, index: usize) -> Option<&Lesson> {
        self.lessons.get(index)
    }

    pub(crate) fn lesson_mut(&mut self, index: usize) -> Option<&mut Lesson> {
        self.lessons.get_mut(index)
    }

    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.lessons.iter().filter(|l| l.is_completed()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LessonKind;

    #[test]
    fn chapter_counts_completed_lessons() {
        let lessons = vec![
            Lesson::new("A", LessonKind::Video, "")
                .unwrap()
                .with_completed(true),
            Lesson::new("B", LessonKind::Reading, "").unwrap(),
        ];
        let chapter = Chapter::new("Basics", "20 min", lessons).unwrap();
        assert_eq!(chapter.lesson_count(), 2);
        assert_eq!(chapter.completed_count(), 1);
        assert!(!chapter.is_empty());
    }

    #[test]
    fn empty_chapter_is_valid() {
        let chapter = Chapter::new("Coming soon", "", Vec::new()).unwrap();
        assert!(chapter.is_empty());
        assert_eq!(chapter.lesson(0), None);
    }

    #[test]
    fn chapter_rejects_blank_title() {
        assert_eq!(
            Chapter::new(" ", "", Vec::new()).unwrap_err(),
            ChapterError::EmptyTitle
        );
    }
}
