#![forbid(unsafe_code)]

pub mod model;
pub mod navigation;
pub mod progress;
pub mod time;

pub use navigation::{
    Availability, CourseShape, Cursor, ExpansionSet, Layout, NavigationError, NavigationState,
    Navigator,
};
pub use progress::{ProgressSummary, course_progress};
pub use time::Clock;
