use std::{collections::BTreeMap, time::Duration};

use anyhow::{bail, Context};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Student, StudentDraft, StudentId},
    error::{ApiErrorBody, ErrorCode},
    protocol::{PageQuery, PagedStudents, SearchTerms},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod controller;
pub mod notifications;
pub mod pagination;
pub mod sort;
pub mod validation;
pub mod view;

pub use controller::{
    ActionOutcome, AlwaysConfirm, ClickTarget, Confirm, ControllerOptions, RosterController,
    UiAction,
};
pub use notifications::{Toast, ToastId, ToastKind, ToastQueue};
pub use validation::{FieldErrors, StudentForm, ValidationMode};
pub use view::RosterView;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/students";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Failure of a single roster API call. Every variant is terminal for the
/// action that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server rejected {} field(s)", .errors.len())]
    Validation { errors: BTreeMap<String, String> },
    #[error("conflict: {}", .message.as_deref().unwrap_or("duplicate unique field"))]
    Conflict { message: Option<String> },
    #[error("not found: {}", .message.as_deref().unwrap_or("no such record"))]
    NotFound { message: Option<String> },
    #[error("server error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Server {
        status: u16,
        message: Option<String>,
    },
}

impl ApiFailure {
    /// Classifies a non-2xx response. A field-keyed error map wins over the
    /// status code, matching how the server reports bean validation.
    pub fn from_response(status: u16, body: Option<ApiErrorBody>) -> Self {
        let ApiErrorBody { message, errors } = body.unwrap_or_default();
        if let Some(errors) = errors.filter(|errors| !errors.is_empty()) {
            return ApiFailure::Validation { errors };
        }
        match ErrorCode::from_status(status) {
            ErrorCode::Conflict => ApiFailure::Conflict { message },
            ErrorCode::NotFound => ApiFailure::NotFound { message },
            ErrorCode::Validation | ErrorCode::Internal => ApiFailure::Server { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiFailure::NotFound { .. })
    }

    /// Message the server attached to the failure, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiFailure::Conflict { message }
            | ApiFailure::NotFound { message }
            | ApiFailure::Server { message, .. } => message.as_deref(),
            ApiFailure::Transport(_) | ApiFailure::Validation { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ApiFailure {
    fn from(value: reqwest::Error) -> Self {
        ApiFailure::Transport(value.to_string())
    }
}

#[async_trait]
pub trait RosterApi: Send + Sync {
    async fn list_students(&self) -> Result<Vec<Student>, ApiFailure>;
    async fn search_students(&self, terms: &SearchTerms) -> Result<Vec<Student>, ApiFailure>;
    async fn list_students_paginated(&self, query: PageQuery)
        -> Result<PagedStudents, ApiFailure>;
    async fn search_students_paginated(
        &self,
        query: PageQuery,
        terms: &SearchTerms,
    ) -> Result<PagedStudents, ApiFailure>;
    async fn get_student(&self, id: StudentId) -> Result<Student, ApiFailure>;
    async fn create_student(&self, draft: &StudentDraft) -> Result<Student, ApiFailure>;
    async fn update_student(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, ApiFailure>;
    async fn delete_student(&self, id: StudentId) -> Result<(), ApiFailure>;
}

/// `RosterApi` over HTTP JSON, rooted at the students collection URL.
pub struct HttpRosterApi {
    http: Client,
    base_url: Url,
}

impl HttpRosterApi {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url =
            Url::parse(base_url.trim()).with_context(|| format!("invalid api url '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("api url '{base_url}' cannot carry path segments");
        }
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(failure_from(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ApiFailure::Transport(format!("invalid response body: {e}")))
}

async fn failure_from(response: Response) -> ApiFailure {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(bytes) => serde_json::from_slice::<ApiErrorBody>(&bytes).ok(),
        Err(err) => {
            warn!(status = status.as_u16(), "roster api: unreadable error body: {err}");
            None
        }
    };
    let failure = ApiFailure::from_response(status.as_u16(), body);
    debug!(status = status.as_u16(), %failure, "roster api: request rejected");
    failure
}

#[async_trait]
impl RosterApi for HttpRosterApi {
    async fn list_students(&self) -> Result<Vec<Student>, ApiFailure> {
        let response = self.http.get(self.endpoint(&[])).send().await?;
        decode(response).await
    }

    async fn search_students(&self, terms: &SearchTerms) -> Result<Vec<Student>, ApiFailure> {
        let response = self
            .http
            .get(self.endpoint(&["search"]))
            .query(terms)
            .send()
            .await?;
        decode(response).await
    }

    async fn list_students_paginated(
        &self,
        query: PageQuery,
    ) -> Result<PagedStudents, ApiFailure> {
        let response = self
            .http
            .get(self.endpoint(&["paginated"]))
            .query(&query)
            .send()
            .await?;
        decode(response).await
    }

    async fn search_students_paginated(
        &self,
        query: PageQuery,
        terms: &SearchTerms,
    ) -> Result<PagedStudents, ApiFailure> {
        let response = self
            .http
            .get(self.endpoint(&["paginated", "search"]))
            .query(&query)
            .query(terms)
            .send()
            .await?;
        decode(response).await
    }

    async fn get_student(&self, id: StudentId) -> Result<Student, ApiFailure> {
        let response = self
            .http
            .get(self.endpoint(&[&id.to_string()]))
            .send()
            .await?;
        decode(response).await
    }

    async fn create_student(&self, draft: &StudentDraft) -> Result<Student, ApiFailure> {
        let response = self
            .http
            .post(self.endpoint(&[]))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    async fn update_student(
        &self,
        id: StudentId,
        draft: &StudentDraft,
    ) -> Result<Student, ApiFailure> {
        let response = self
            .http
            .put(self.endpoint(&[&id.to_string()]))
            .json(draft)
            .send()
            .await?;
        decode(response).await
    }

    async fn delete_student(&self, id: StudentId) -> Result<(), ApiFailure> {
        let response = self
            .http
            .delete(self.endpoint(&[&id.to_string()]))
            .send()
            .await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(failure_from(response).await)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
