use course_core::model::{Course, CourseId, Lesson, LessonContent, LessonKind};
use course_core::{Cursor, NavigationState, ProgressSummary};

/// Presentation-agnostic snapshot of a loaded course player.
///
/// No pre-formatted strings: the UI decides how to render labels, icons and
/// the percentage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerView {
    pub course_id: CourseId,
    pub title: String,
    pub instructor: String,
    pub navigation: NavigationState,
    pub progress: ProgressSummary,
    pub current: Option<LessonView>,
    pub chapters: Vec<ChapterOutline>,
}

/// The lesson under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonView {
    pub chapter: usize,
    pub lesson: usize,
    pub title: String,
    pub kind: LessonKind,
    pub duration: String,
    pub completed: bool,
    pub progress: Option<u8>,
    pub content: Option<LessonContent>,
    pub resources: Option<u32>,
}

impl LessonView {
    #[must_use]
    pub fn from_lesson(cursor: Cursor, lesson: &Lesson) -> Self {
        Self {
            chapter: cursor.chapter,
            lesson: cursor.lesson,
            title: lesson.title().to_owned(),
            kind: lesson.kind(),
            duration: lesson.duration().to_owned(),
            completed: lesson.is_completed(),
            progress: lesson.progress(),
            content: lesson.content().cloned(),
            resources: lesson.resources(),
        }
    }
}

/// One row of the chapter list in the navigation panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterOutline {
    pub index: usize,
    pub title: String,
    pub duration: String,
    pub progress: ProgressSummary,
    pub expanded: bool,
    pub active: bool,
    /// Empty for a chapter that has no lessons yet.
    pub lessons: Vec<LessonOutline>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonOutline {
    pub index: usize,
    pub title: String,
    pub kind: LessonKind,
    pub duration: String,
    pub completed: bool,
    pub active: bool,
}

impl PlayerView {
    #[must_use]
    pub fn build(course: &Course, navigation: NavigationState) -> Self {
        let cursor = navigation.cursor;
        let current = course
            .lesson(cursor.chapter, cursor.lesson)
            .map(|lesson| LessonView::from_lesson(cursor, lesson));

        let chapters = course
            .chapters()
            .iter()
            .enumerate()
            .map(|(index, chapter)| {
                let active = index == cursor.chapter;
                ChapterOutline {
                    index,
                    title: chapter.title().to_owned(),
                    duration: chapter.duration().to_owned(),
                    progress: ProgressSummary::of_chapter(chapter),
                    expanded: navigation.expanded.contains(index),
                    active,
                    lessons: chapter
                        .lessons()
                        .iter()
                        .enumerate()
                        .map(|(l, lesson)| LessonOutline {
                            index: l,
                            title: lesson.title().to_owned(),
                            kind: lesson.kind(),
                            duration: lesson.duration().to_owned(),
                            completed: lesson.is_completed(),
                            active: active && l == cursor.lesson,
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            course_id: course.id().clone(),
            title: course.title().to_owned(),
            instructor: course.instructor().to_owned(),
            navigation,
            progress: ProgressSummary::of_course(course),
            current,
            chapters,
        }
    }
}
