use std::fmt;

use thiserror::Error;
use url::Url;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson title cannot be empty")]
    EmptyTitle,

    #[error("lesson progress must be between 0 and 100, got {0}")]
    InvalidProgress(i64),
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// What the lesson player shows for a lesson.
///
/// Unknown type labels are kept as `Other` rather than rejected, so a course
/// authored with a newer lesson type still loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LessonKind {
    Video,
    Reading,
    Assignment,
    #[default]
    Other,
}

impl LessonKind {
    /// Maps a document type label onto a kind. Matching is case-insensitive.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "video" => Self::Video,
            "reading" => Self::Reading,
            "assignment" => Self::Assignment,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Reading => "reading",
            Self::Assignment => "assignment",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for LessonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CONTENT ───────────────────────────────────────────────────────────────────
//

/// Lesson payload: a link to hosted media or an inline text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    Url(Url),
    Text(String),
}

impl LessonContent {
    /// Classifies a raw payload. Absolute http(s) URLs become `Url`, anything
    /// else non-blank becomes `Text`. Blank payloads yield `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match Url::parse(trimmed) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(Self::Url(url)),
            _ => Some(Self::Text(trimmed.to_owned())),
        }
    }

    #[must_use]
    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Self::Url(u) => Some(u),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(t) => Some(t),
            Self::Url(_) => None,
        }
    }

    /// Raw string form, as stored in a course document.
    #[must_use]
    pub fn as_raw(&self) -> &str {
        match self {
            Self::Url(u) => u.as_str(),
            Self::Text(t) => t,
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A single lesson inside a chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    title: String,
    kind: LessonKind,
    kind_label: Option<String>,
    duration: String,
    completed: bool,
    progress: Option<u8>,
    content: Option<LessonContent>,
    resources: Option<u32>,
}

impl Lesson {
    /// Creates an incomplete lesson with no content.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::EmptyTitle` if the title is empty or whitespace-only.
    pub fn new(
        title: impl Into<String>,
        kind: LessonKind,
        duration: impl Into<String>,
    ) -> Result<Self, LessonError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LessonError::EmptyTitle);
        }
        Ok(Self {
            title: title.trim().to_owned(),
            kind,
            kind_label: Some(kind.as_str().to_owned()),
            duration: duration.into().trim().to_owned(),
            completed: false,
            progress: None,
            content: None,
            resources: None,
        })
    }

    /// Marks the lesson completed. Completed lessons carry no partial progress.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        if completed {
            self.progress = None;
        }
        self
    }

    /// Sets partial progress for an incomplete lesson.
    ///
    /// Ignored when the lesson is already completed.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::InvalidProgress` if `percent` is above 100.
    pub fn with_progress(mut self, percent: i64) -> Result<Self, LessonError> {
        let value = u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(LessonError::InvalidProgress(percent))?;
        if !self.completed {
            self.progress = Some(value);
        }
        Ok(self)
    }

    /// Overrides the type label written back to course documents.
    /// `None` means the document carried no type at all.
    #[must_use]
    pub fn with_kind_label(mut self, label: Option<String>) -> Self {
        self.kind_label = label;
        self
    }

    #[must_use]
    pub fn with_content(mut self, content: Option<LessonContent>) -> Self {
        self.content = content;
        self
    }

    #[must_use]
    pub fn with_resources(mut self, resources: Option<u32>) -> Self {
        self.resources = resources;
        self
    }

    // Accessors
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    /// Type label as authored, e.g. `"quiz"` for a `LessonKind::Other` lesson.
    #[must_use]
    pub fn kind_label(&self) -> Option<&str> {
        self.kind_label.as_deref()
    }

    #[must_use]
    pub fn duration(&self) -> &str {
        &self.duration
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Partial progress percentage, only reported while incomplete.
    #[must_use]
    pub fn progress(&self) -> Option<u8> {
        if self.completed { None } else { self.progress }
    }

    #[must_use]
    pub fn content(&self) -> Option<&LessonContent> {
        self.content.as_ref()
    }

    #[must_use]
    pub fn resources(&self) -> Option<u32> {
        self.resources
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
