//! Lesson cursor, chapter expansion and sidebar state for the course player.
//!
//! Every command checks its boundary before touching state and returns the
//! resulting [`NavigationState`], so callers re-render from the returned
//! snapshot instead of observing mutations.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::Course;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NavigationError {
    #[error("chapter {chapter} is out of range ({chapter_count} chapters)")]
    ChapterOutOfRange {
        chapter: usize,
        chapter_count: usize,
    },

    #[error("lesson {lesson} is out of range for chapter {chapter} ({lesson_count} lessons)")]
    LessonOutOfRange {
        chapter: usize,
        lesson: usize,
        lesson_count: usize,
    },
}

//
// ─── STATE TYPES ───────────────────────────────────────────────────────────────
//

/// Zero-based `(chapter, lesson)` position of the lesson being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cursor {
    pub chapter: usize,
    pub lesson: usize,
}

impl Cursor {
    #[must_use]
    pub fn new(chapter: usize, lesson: usize) -> Self {
        Self { chapter, lesson }
    }
}

/// Chapter indices whose lesson list is shown in the navigation panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpansionSet(BTreeSet<usize>);

impl ExpansionSet {
    #[must_use]
    pub fn contains(&self, chapter: usize) -> bool {
        self.0.contains(&chapter)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, chapter: usize) {
        self.0.insert(chapter);
    }

    fn toggle(&mut self, chapter: usize) {
        if !self.0.remove(&chapter) {
            self.0.insert(chapter);
        }
    }
}

/// Viewport class. On `Compact` layouts the chapter list is an overlay that
/// closes once a lesson is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    Compact,
    #[default]
    Wide,
}

/// Which navigation controls are currently usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Availability {
    pub has_next_lesson: bool,
    pub has_prev_lesson: bool,
    pub has_next_chapter: bool,
    pub has_prev_chapter: bool,
}

/// Snapshot returned by every navigation command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub cursor: Cursor,
    pub expanded: ExpansionSet,
    pub layout: Layout,
    pub sidebar_open: bool,
    pub availability: Availability,
}

/// Lesson counts per chapter: all the navigator needs to know about a course.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CourseShape {
    lesson_counts: Vec<usize>,
}

impl CourseShape {
    #[must_use]
    pub fn new(lesson_counts: Vec<usize>) -> Self {
        Self { lesson_counts }
    }

    #[must_use]
    pub fn of_course(course: &Course) -> Self {
        Self::new(course.lesson_counts())
    }

    #[must_use]
    pub fn chapter_count(&self) -> usize {
        self.lesson_counts.len()
    }

    /// Lessons in `chapter`, or `None` if the chapter does not exist.
    #[must_use]
    pub fn lesson_count(&self, chapter: usize) -> Option<usize> {
        self.lesson_counts.get(chapter).copied()
    }

    /// Confirms `(chapter, lesson)` names an existing lesson.
    ///
    /// # Errors
    ///
    /// Returns the matching `NavigationError` for an unknown chapter or lesson.
    pub fn check_position(&self, chapter: usize, lesson: usize) -> Result<(), NavigationError> {
        let lesson_count = self.check_chapter(chapter)?;
        if lesson >= lesson_count {
            return Err(NavigationError::LessonOutOfRange {
                chapter,
                lesson,
                lesson_count,
            });
        }
        Ok(())
    }

    fn check_chapter(&self, chapter: usize) -> Result<usize, NavigationError> {
        self.lesson_count(chapter)
            .ok_or(NavigationError::ChapterOutOfRange {
                chapter,
                chapter_count: self.chapter_count(),
            })
    }
}

//
// ─── NAVIGATOR ─────────────────────────────────────────────────────────────────
//

/// Session-local navigation engine over one course shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    shape: CourseShape,
    cursor: Cursor,
    expanded: ExpansionSet,
    layout: Layout,
    sidebar_open: bool,
}

impl Navigator {
    /// Starts at `(0, 0)` with the first chapter expanded.
    #[must_use]
    pub fn new(shape: CourseShape, layout: Layout) -> Self {
        let mut nav = Self {
            shape,
            cursor: Cursor::default(),
            expanded: ExpansionSet::default(),
            layout,
            sidebar_open: false,
        };
        nav.reset();
        nav
    }

    #[must_use]
    pub fn for_course(course: &Course, layout: Layout) -> Self {
        Self::new(CourseShape::of_course(course), layout)
    }

    #[must_use]
    pub fn shape(&self) -> &CourseShape {
        &self.shape
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn expanded(&self) -> &ExpansionSet {
        &self.expanded
    }

    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[must_use]
    pub fn sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// Cursor back to `(0, 0)`, expansion back to the first chapter only.
    pub fn reset(&mut self) -> NavigationState {
        self.cursor = Cursor::default();
        self.expanded = ExpansionSet::default();
        if self.shape.chapter_count() > 0 {
            self.expanded.insert(0);
        }
        self.state()
    }

    /// Jump to a specific lesson.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` if either index does not name an existing
    /// chapter or lesson. State is left untouched in that case.
    pub fn select_lesson(
        &mut self,
        chapter: usize,
        lesson: usize,
    ) -> Result<NavigationState, NavigationError> {
        self.shape.check_position(chapter, lesson)?;

        self.move_to(Cursor::new(chapter, lesson));
        if self.layout == Layout::Compact {
            self.sidebar_open = false;
        }
        Ok(self.state())
    }

    /// Next lesson in the chapter, else first lesson of the next chapter.
    /// No-op on the last lesson of the last chapter.
    pub fn next_lesson(&mut self) -> NavigationState {
        if self.next_lesson_in_chapter() {
            self.move_to(Cursor::new(self.cursor.chapter, self.cursor.lesson + 1));
            return self.state();
        }
        self.next_chapter()
    }

    /// Previous lesson in the chapter, else start of the previous chapter.
    /// No-op on the first lesson of the first chapter.
    pub fn prev_lesson(&mut self) -> NavigationState {
        if self.cursor.lesson > 0 {
            self.move_to(Cursor::new(self.cursor.chapter, self.cursor.lesson - 1));
            return self.state();
        }
        self.prev_chapter()
    }

    pub fn next_chapter(&mut self) -> NavigationState {
        if self.has_next_chapter() {
            self.move_to(Cursor::new(self.cursor.chapter + 1, 0));
        }
        self.state()
    }

    pub fn prev_chapter(&mut self) -> NavigationState {
        if self.has_prev_chapter() {
            self.move_to(Cursor::new(self.cursor.chapter - 1, 0));
        }
        self.state()
    }

    /// Show or hide a chapter's lessons. Does not move the cursor.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError::ChapterOutOfRange` for an unknown chapter.
    pub fn toggle_chapter(&mut self, chapter: usize) -> Result<NavigationState, NavigationError> {
        self.shape.check_chapter(chapter)?;
        self.expanded.toggle(chapter);
        Ok(self.state())
    }

    pub fn toggle_sidebar(&mut self) -> NavigationState {
        self.sidebar_open = !self.sidebar_open;
        self.state()
    }

    /// Switching to `Wide` closes the overlay panel.
    pub fn set_layout(&mut self, layout: Layout) -> NavigationState {
        self.layout = layout;
        if layout == Layout::Wide {
            self.sidebar_open = false;
        }
        self.state()
    }

    #[must_use]
    pub fn availability(&self) -> Availability {
        let has_next_chapter = self.has_next_chapter();
        let has_prev_chapter = self.has_prev_chapter();
        Availability {
            has_next_lesson: self.next_lesson_in_chapter() || has_next_chapter,
            has_prev_lesson: self.cursor.lesson > 0 || has_prev_chapter,
            has_next_chapter,
            has_prev_chapter,
        }
    }

    #[must_use]
    pub fn state(&self) -> NavigationState {
        NavigationState {
            cursor: self.cursor,
            expanded: self.expanded.clone(),
            layout: self.layout,
            sidebar_open: self.sidebar_open,
            availability: self.availability(),
        }
    }

    fn next_lesson_in_chapter(&self) -> bool {
        self.shape
            .lesson_count(self.cursor.chapter)
            .is_some_and(|count| self.cursor.lesson + 1 < count)
    }

    fn has_next_chapter(&self) -> bool {
        self.cursor.chapter + 1 < self.shape.chapter_count()
    }

    fn has_prev_chapter(&self) -> bool {
        self.cursor.chapter > 0
    }

    // Every cursor change also expands the target chapter.
    fn move_to(&mut self, cursor: Cursor) {
        self.cursor = cursor;
        self.expanded.insert(cursor.chapter);
        debug_assert!(
            self.cursor_in_bounds(),
            "cursor {:?} escaped course shape {:?}",
            self.cursor,
            self.shape
        );
    }

    // An empty chapter keeps the lesson index at 0.
    fn cursor_in_bounds(&self) -> bool {
        match self.shape.lesson_count(self.cursor.chapter) {
            Some(0) => self.cursor.lesson == 0,
            Some(count) => self.cursor.lesson < count,
            None => self.shape.chapter_count() == 0 && self.cursor == Cursor::default(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
