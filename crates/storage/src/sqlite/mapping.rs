use chrono::{DateTime, Utc};
use course_core::model::{Course, CourseDocument, CourseId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// JSON document column for a course.
pub(crate) fn course_to_document(course: &Course) -> Result<String, StorageError> {
    CourseDocument::from(course).to_json().map_err(ser)
}

/// Rebuilds a course from a `courses` row, validating the stored document.
pub(crate) fn map_course_row(row: &SqliteRow) -> Result<Course, StorageError> {
    let id: String = row.try_get("id").map_err(ser)?;
    let id = CourseId::new(id).map_err(ser)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(ser)?;
    let document: String = row.try_get("document").map_err(ser)?;

    CourseDocument::from_json(&document)
        .and_then(|doc| doc.into_course(id.clone(), updated_at))
        .map_err(|e| StorageError::Serialization(format!("course {id}: {e}")))
}
