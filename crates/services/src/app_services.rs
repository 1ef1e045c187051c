use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::catalog::CatalogService;
use crate::completion::CompletionService;
use crate::error::AppServicesError;
use crate::provider::{CourseProvider, RepositoryCourseProvider};

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    provider: Arc<dyn CourseProvider>,
    catalog: Arc<CatalogService>,
    completion: Arc<CompletionService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    /// Build services over an already-open storage aggregate.
    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let provider: Arc<dyn CourseProvider> =
            Arc::new(RepositoryCourseProvider::new(Arc::clone(&storage.courses)));
        Self {
            provider,
            catalog: Arc::new(CatalogService::new(Arc::clone(&storage.courses))),
            completion: Arc::new(CompletionService::new(clock, Arc::clone(&storage.courses))),
        }
    }

    /// Replace the course source, e.g. with an `HttpCourseProvider`.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn CourseProvider>) -> Self {
        self.provider = provider;
        self
    }

    #[must_use]
    pub fn provider(&self) -> Arc<dyn CourseProvider> {
        Arc::clone(&self.provider)
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    #[must_use]
    pub fn completion(&self) -> Arc<CompletionService> {
        Arc::clone(&self.completion)
    }
}
