use course_core::model::{Course, CourseId};
use course_core::{Cursor, Layout};
use tracing::{debug, info, warn};

use super::session::PlayerSession;
use super::view::PlayerView;
use crate::error::LoadError;
use crate::provider::CourseProvider;

/// Where the player is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        id: CourseId,
    },
    Ready(PlayerSession),
    Failed {
        id: CourseId,
        error: LoadError,
    },
}

/// Handle for one in-flight fetch. Only the ticket of the most recent
/// `begin_load` can commit a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    id: CourseId,
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn id(&self) -> &CourseId {
        &self.id
    }
}

/// What `finish_load` did with a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready,
    Failed,
    /// A newer load started before this result arrived.
    Discarded,
}

/// What the presentation layer renders for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerSnapshot {
    Idle,
    Loading { id: CourseId },
    Ready(Box<PlayerView>),
    Failed {
        id: CourseId,
        message: &'static str,
        detail: String,
    },
}

/// Course player for one viewing session.
///
/// Owns the load lifecycle and, once a course arrives, the `PlayerSession`.
/// A new load replaces the tree wholesale and resets navigation.
#[derive(Debug, Clone, Default)]
pub struct CoursePlayer {
    layout: Layout,
    desired: Option<CourseId>,
    generation: u64,
    state: LoadState,
}

impl CoursePlayer {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&PlayerSession> {
        match &self.state {
            LoadState::Ready(session) => Some(session),
            _ => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut PlayerSession> {
        match &mut self.state {
            LoadState::Ready(session) => Some(session),
            _ => None,
        }
    }

    /// Cursor of the loaded session, or `(0, 0)` while nothing is loaded.
    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.session().map(PlayerSession::cursor).unwrap_or_default()
    }

    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        match &self.state {
            LoadState::Idle => PlayerSnapshot::Idle,
            LoadState::Loading { id } => PlayerSnapshot::Loading { id: id.clone() },
            LoadState::Ready(session) => PlayerSnapshot::Ready(Box::new(session.view())),
            LoadState::Failed { id, error } => PlayerSnapshot::Failed {
                id: id.clone(),
                message: error.user_message(),
                detail: error.to_string(),
            },
        }
    }

    /// Viewport change, applied to the live session and to future loads.
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        if let Some(session) = self.session_mut() {
            session.set_layout(layout);
        }
    }

    /// Start loading `id`. Drops any loaded course and supersedes older tickets.
    pub fn begin_load(&mut self, id: CourseId) -> LoadTicket {
        self.generation += 1;
        self.desired = Some(id.clone());
        self.state = LoadState::Loading { id: id.clone() };
        debug!(course_id = %id, generation = self.generation, "course load started");
        LoadTicket {
            id,
            generation: self.generation,
        }
    }

    /// Commit a fetch result if `ticket` is still the current load.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Course, LoadError>,
    ) -> LoadOutcome {
        let current = ticket.generation == self.generation
            && self.desired.as_ref() == Some(&ticket.id);
        if !current {
            warn!(
                course_id = %ticket.id,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale course load"
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(course) => {
                info!(
                    course_id = %ticket.id,
                    chapters = course.chapter_count(),
                    lessons = course.total_lessons(),
                    "course loaded"
                );
                self.state = LoadState::Ready(PlayerSession::new(course, self.layout));
                LoadOutcome::Ready
            }
            Err(error) => {
                warn!(course_id = %ticket.id, %error, "course load failed");
                self.state = LoadState::Failed {
                    id: ticket.id,
                    error,
                };
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch `id` from `provider` and commit the result.
    pub async fn open(&mut self, provider: &dyn CourseProvider, id: CourseId) -> LoadOutcome {
        let ticket = self.begin_load(id);
        let result = provider.fetch_course(ticket.id()).await;
        self.finish_load(ticket, result)
    }

    /// User-initiated "Try Again": re-fetch the last requested course.
    ///
    /// Returns `None` when nothing has been requested yet.
    pub async fn retry(&mut self, provider: &dyn CourseProvider) -> Option<LoadOutcome> {
        let id = self.desired.clone()?;
        Some(self.open(provider, id).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use course_core::model::{Chapter, Lesson, LessonKind};
    use course_core::time::fixed_now;
    use storage::repository::{CourseRepository, InMemoryRepository};

    use crate::provider::RepositoryCourseProvider;

    fn course(id: &str, chapters: usize) -> Course {
        let chapters = (0..chapters)
            .map(|c| {
                Chapter::new(
                    format!("Chapter {c}"),
                    "",
                    vec![
                        Lesson::new("a", LessonKind::Video, "").unwrap(),
                        Lesson::new("b", LessonKind::Reading, "").unwrap(),
                    ],
                )
                .unwrap()
            })
            .collect();
        Course::new(CourseId::new(id).unwrap(), id, "", chapters, fixed_now()).unwrap()
    }

    fn id(raw: &str) -> CourseId {
        CourseId::new(raw).unwrap()
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut player = CoursePlayer::new(Layout::Wide);
        let first = player.begin_load(id("a"));
        let second = player.begin_load(id("b"));

        assert_eq!(player.finish_load(first, Ok(course("a", 1))), LoadOutcome::Discarded);
        assert_eq!(player.state(), &LoadState::Loading { id: id("b") });

        assert_eq!(player.finish_load(second, Ok(course("b", 2))), LoadOutcome::Ready);
        assert_eq!(player.session().map(|s| s.course().id().as_str()), Some("b"));
    }

    #[test]
    fn reloading_same_id_still_discards_older_ticket() {
        let mut player = CoursePlayer::new(Layout::Wide);
        let first = player.begin_load(id("a"));
        let second = player.begin_load(id("a"));

        assert_eq!(
            player.finish_load(first, Err(LoadError::Transport("late".into()))),
            LoadOutcome::Discarded
        );
        assert_eq!(player.finish_load(second, Ok(course("a", 1))), LoadOutcome::Ready);
    }

    #[test]
    fn new_load_resets_navigation() {
        let mut player = CoursePlayer::new(Layout::Wide);
        let ticket = player.begin_load(id("a"));
        player.finish_load(ticket, Ok(course("a", 2)));
        player.session_mut().unwrap().select_lesson(1, 1).unwrap();
        assert_eq!(player.cursor(), Cursor::new(1, 1));

        let ticket = player.begin_load(id("a"));
        assert_eq!(player.cursor(), Cursor::default());
        player.finish_load(ticket, Ok(course("a", 2)));
        assert_eq!(player.cursor(), Cursor::default());
        let expanded: Vec<usize> = player
            .session()
            .unwrap()
            .navigator()
            .expanded()
            .iter()
            .collect();
        assert_eq!(expanded, vec![0]);
    }

    #[tokio::test]
    async fn not_found_sets_failed_state_and_keeps_default_cursor() {
        let provider = RepositoryCourseProvider::new(Arc::new(InMemoryRepository::new()));
        let mut player = CoursePlayer::new(Layout::Wide);

        let outcome = player.open(&provider, id("X")).await;

        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(player.cursor(), Cursor::new(0, 0));
        assert_eq!(
            player.state(),
            &LoadState::Failed {
                id: id("X"),
                error: LoadError::NotFound { id: id("X") },
            }
        );
        match player.snapshot() {
            PlayerSnapshot::Failed { id: failed, message, .. } => {
                assert_eq!(failed.as_str(), "X");
                assert!(!message.is_empty());
            }
            other => panic!("unexpected snapshot: {other:?}"),
        }
    }

    #[tokio::test]
    async fn retry_refetches_after_data_appears() {
        let repo = InMemoryRepository::new();
        let provider = RepositoryCourseProvider::new(Arc::new(repo.clone()));
        let mut player = CoursePlayer::new(Layout::Wide);

        assert_eq!(player.retry(&provider).await, None);
        assert_eq!(player.open(&provider, id("late")).await, LoadOutcome::Failed);

        repo.upsert_course(&course("late", 1)).await.unwrap();
        assert_eq!(player.retry(&provider).await, Some(LoadOutcome::Ready));
        assert!(matches!(player.snapshot(), PlayerSnapshot::Ready(_)));
    }

    #[test]
    fn layout_applies_to_live_and_future_sessions() {
        let mut player = CoursePlayer::new(Layout::Wide);
        let ticket = player.begin_load(id("a"));
        player.finish_load(ticket, Ok(course("a", 1)));
        player.set_layout(Layout::Compact);
        assert_eq!(player.session().unwrap().navigator().layout(), Layout::Compact);

        let ticket = player.begin_load(id("a"));
        player.finish_load(ticket, Ok(course("a", 1)));
        assert_eq!(player.session().unwrap().navigator().layout(), Layout::Compact);
    }
}
