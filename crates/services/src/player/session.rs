use course_core::model::{Course, Lesson};
use course_core::{Cursor, Layout, NavigationError, Navigator, ProgressSummary};

use super::view::PlayerView;

/// A loaded course plus the learner's navigation state.
///
/// The course tree never changes for the life of the session; a completion
/// write-back is followed by a fresh load, which builds a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSession {
    course: Course,
    navigator: Navigator,
}

impl PlayerSession {
    #[must_use]
    pub fn new(course: Course, layout: Layout) -> Self {
        let navigator = Navigator::for_course(&course, layout);
        Self { course, navigator }
    }

    #[must_use]
    pub fn course(&self) -> &Course {
        &self.course
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.navigator.cursor()
    }

    #[must_use]
    pub fn current_lesson(&self) -> Option<&Lesson> {
        let cursor = self.cursor();
        self.course.lesson(cursor.chapter, cursor.lesson)
    }

    #[must_use]
    pub fn progress(&self) -> ProgressSummary {
        ProgressSummary::of_course(&self.course)
    }

    #[must_use]
    pub fn view(&self) -> PlayerView {
        PlayerView::build(&self.course, self.navigator.state())
    }

    /// # Errors
    ///
    /// Returns `NavigationError` if the indices do not name an existing lesson.
    pub fn select_lesson(
        &mut self,
        chapter: usize,
        lesson: usize,
    ) -> Result<PlayerView, NavigationError> {
        let state = self.navigator.select_lesson(chapter, lesson)?;
        Ok(PlayerView::build(&self.course, state))
    }

    pub fn next_lesson(&mut self) -> PlayerView {
        let state = self.navigator.next_lesson();
        PlayerView::build(&self.course, state)
    }

    pub fn prev_lesson(&mut self) -> PlayerView {
        let state = self.navigator.prev_lesson();
        PlayerView::build(&self.course, state)
    }

    pub fn next_chapter(&mut self) -> PlayerView {
        let state = self.navigator.next_chapter();
        PlayerView::build(&self.course, state)
    }

    pub fn prev_chapter(&mut self) -> PlayerView {
        let state = self.navigator.prev_chapter();
        PlayerView::build(&self.course, state)
    }

    /// # Errors
    ///
    /// Returns `NavigationError::ChapterOutOfRange` for an unknown chapter.
    pub fn toggle_chapter(&mut self, chapter: usize) -> Result<PlayerView, NavigationError> {
        let state = self.navigator.toggle_chapter(chapter)?;
        Ok(PlayerView::build(&self.course, state))
    }

    pub fn toggle_sidebar(&mut self) -> PlayerView {
        let state = self.navigator.toggle_sidebar();
        PlayerView::build(&self.course, state)
    }

    pub fn set_layout(&mut self, layout: Layout) -> PlayerView {
        let state = self.navigator.set_layout(layout);
        PlayerView::build(&self.course, state)
    }
}
