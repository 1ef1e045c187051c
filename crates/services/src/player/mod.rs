mod loader;
mod session;
mod view;

// Public API of the course player.
pub use crate::error::LoadError;
pub use loader::{CoursePlayer, LoadOutcome, LoadState, LoadTicket, PlayerSnapshot};
pub use session::PlayerSession;
pub use view::{ChapterOutline, LessonOutline, LessonView, PlayerView};
