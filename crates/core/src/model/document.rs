//! Loose document shape of a course, as held by a document store.
//!
//! Every field is optional at the serde level so that shape problems are
//! reported by [`CourseDocument::into_course`] with a precise position
//! instead of a generic decode error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::chapter::Chapter;
use crate::model::course::{Course, CourseError};
use crate::model::ids::CourseId;
use crate::model::lesson::{Lesson, LessonContent, LessonKind};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<ChapterDocument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<LessonDocument>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<u32>,
}

impl CourseDocument {
    /// Decode a JSON course document.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::InvalidDocument` if the text is not a JSON object
    /// of the expected shape.
    pub fn from_json(raw: &str) -> Result<Self, CourseError> {
        serde_json::from_str(raw).map_err(|e| CourseError::InvalidDocument(e.to_string()))
    }

    /// Encode as JSON.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::InvalidDocument` if serialization fails.
    pub fn to_json(&self) -> Result<String, CourseError> {
        serde_json::to_string(self).map_err(|e| CourseError::InvalidDocument(e.to_string()))
    }

    /// Parse-or-reject: build a validated `Course` from the loose document.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` naming the first missing or invalid field.
    pub fn into_course(
        self,
        id: CourseId,
        updated_at: DateTime<Utc>,
    ) -> Result<Course, CourseError> {
        let title = self
            .title
            .ok_or_else(|| CourseError::MissingField("title".into()))?;
        let chapters = self
            .chapters
            .ok_or_else(|| CourseError::MissingField("chapters".into()))?;

        let chapters = chapters
            .into_iter()
            .enumerate()
            .map(|(index, chapter)| chapter.into_chapter(index))
            .collect::<Result<Vec<_>, _>>()?;

        Course::new(
            id,
            title,
            self.instructor.unwrap_or_default(),
            chapters,
            updated_at,
        )
    }
}

impl ChapterDocument {
    fn into_chapter(self, index: usize) -> Result<Chapter, CourseError> {
        let title = self
            .title
            .ok_or_else(|| CourseError::MissingField(format!("chapters[{index}].title")))?;
        let lessons = self
            .lessons
            .ok_or_else(|| CourseError::MissingField(format!("chapters[{index}].lessons")))?;

        let lessons = lessons
            .into_iter()
            .enumerate()
            .map(|(lesson, doc)| doc.into_lesson(index, lesson))
            .collect::<Result<Vec<_>, _>>()?;

        Chapter::new(title, self.duration.unwrap_or_default(), lessons)
            .map_err(|source| CourseError::Chapter { index, source })
    }
}

impl LessonDocument {
    fn into_lesson(self, chapter: usize, lesson: usize) -> Result<Lesson, CourseError> {
        let title = self.title.ok_or_else(|| {
            CourseError::MissingField(format!("chapters[{chapter}].lessons[{lesson}].title"))
        })?;
        let at = |source| CourseError::Lesson {
            chapter,
            lesson,
            source,
        };

        let kind = self
            .kind
            .as_deref()
            .map_or(LessonKind::Other, LessonKind::from_label);
        let mut built = Lesson::new(title, kind, self.duration.unwrap_or_default())
            .map_err(at)?
            .with_kind_label(self.kind)
            .with_completed(self.completed)
            .with_content(self.content.as_deref().and_then(LessonContent::parse))
            .with_resources(self.resources);
        if let Some(progress) = self.progress {
            built = built.with_progress(progress).map_err(at)?;
        }
        Ok(built)
    }
}

impl From<&Course> for CourseDocument {
    fn from(course: &Course) -> Self {
        Self {
            title: Some(course.title().to_owned()),
            instructor: Some(course.instructor().to_owned()),
            chapters: Some(course.chapters().iter().map(ChapterDocument::from).collect()),
        }
    }
}

impl From<&Chapter> for ChapterDocument {
    fn from(chapter: &Chapter) -> Self {
        Self {
            title: Some(chapter.title().to_owned()),
            duration: Some(chapter.duration().to_owned()),
            lessons: Some(chapter.lessons().iter().map(LessonDocument::from).collect()),
        }
    }
}

impl From<&Lesson> for LessonDocument {
    fn from(lesson: &Lesson) -> Self {
        Self {
            title: Some(lesson.title().to_owned()),
            kind: lesson.kind_label().map(str::to_owned),
            duration: Some(lesson.duration().to_owned()),
            completed: lesson.is_completed(),
            progress: lesson.progress().map(i64::from),
            content: lesson.content().map(|c| c.as_raw().to_owned()),
            resources: lesson.resources(),
        }
    }
}
