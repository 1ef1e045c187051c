//! Course documents fetched over HTTP from a hosted document store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use course_core::model::{Course, CourseDocument, CourseError, CourseId};
use reqwest::{Client, StatusCode};
use url::Url;
use serde::Deserialize;

use crate::error::LoadError;
use crate::provider::CourseProvider;

#[derive(Clone, Debug)]
pub struct HttpProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl HttpProviderConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `GET {base_url}/courses/{id}` returning a JSON course document.
#[derive(Clone)]
pub struct HttpCourseProvider {
    client: Client,
    base_url: Url,
}

impl HttpCourseProvider {
    /// # Errors
    ///
    /// Returns `LoadError::Transport` if the base URL does not parse, cannot
    /// carry path segments, or the HTTP client cannot be built.
    pub fn new(config: HttpProviderConfig) -> Result<Self, LoadError> {
        let base_url = Url::parse(config.base_url.trim())
            .map_err(|e| LoadError::Transport(format!("base url {}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(LoadError::Transport(format!(
                "base url {} cannot hold a path",
                config.base_url
            )));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        Ok(Self { client, base_url })
    }

    /// The id is pushed as a single escaped path segment.
    fn course_url(&self, id: &CourseId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("courses").push(id.as_str());
        }
        url
    }
}

#[async_trait]
impl CourseProvider for HttpCourseProvider {
    async fn fetch_course(&self, id: &CourseId) -> Result<Course, LoadError> {
        let url = self.course_url(id);
        tracing::debug!(%url, "requesting course document");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(LoadError::NotFound { id: id.clone() }),
            status if !status.is_success() => {
                return Err(LoadError::Transport(format!("status {status}")));
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        let remote: RemoteCourse = serde_json::from_str(&body)
            .map_err(|e| LoadError::Malformed(CourseError::InvalidDocument(e.to_string())))?;

        let updated_at = remote.updated_at.unwrap_or_else(Utc::now);
        Ok(remote.document.into_course(id.clone(), updated_at)?)
    }
}

/// Wire envelope: the document fields plus optional store metadata.
#[derive(Debug, Deserialize)]
struct RemoteCourse {
    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    document: CourseDocument,
}
