use course_core::model::{Course, CourseId};

use super::SqliteRepository;
use super::mapping::{course_to_document, map_course_row};
use crate::repository::{CourseRepository, StorageError};

#[async_trait::async_trait]
impl CourseRepository for SqliteRepository {
    async fn upsert_course(&self, course: &Course) -> Result<(), StorageError> {
        let document = course_to_document(course)?;

        sqlx::query(
            r"
            INSERT INTO courses (id, title, instructor, document, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                instructor = excluded.instructor,
                document = excluded.document,
                updated_at = excluded.updated_at
            ",
        )
        .bind(course.id().as_str())
        .bind(course.title())
        .bind(course.instructor())
        .bind(document)
        .bind(course.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_course(&self, id: &CourseId) -> Result<Option<Course>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, document, updated_at
            FROM courses WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_course_row).transpose()
    }

    async fn list_courses(&self, limit: u32) -> Result<Vec<Course>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, document, updated_at
            FROM courses
            ORDER BY id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        // A corrupt document must not hide the rest of the catalog.
        let courses = rows
            .iter()
            .filter_map(|row| match map_course_row(row) {
                Ok(course) => Some(course),
                Err(err) => {
                    tracing::warn!(%err, "skipping undecodable course row");
                    None
                }
            })
            .collect();
        Ok(courses)
    }

    async fn delete_course(&self, id: &CourseId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM courses WHERE id = ?1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
