//! Client trait for testability.
//!
//! Commands talk to the service through [`StudyGroupClient`] so they can be unit
//! tested against a mock instead of a running server.

use async_trait::async_trait;
use pumapal_api::{
    CreateGroupRequest, ErrorBody, JoinRequest, LeaveRequest, LeaveResponse, SearchRequest,
    StudyGroupDto, UpdateGroupRequest, API_BASE,
};
use reqwest::Response;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The service answered with an error body.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Could not reach the PumaPal server: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// The `/api/study-groups` operations.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StudyGroupClient: Send + Sync {
    async fn list_groups(&self) -> Result<Vec<StudyGroupDto>, ClientError>;

    async fn search_groups(&self, course: &str) -> Result<Vec<StudyGroupDto>, ClientError>;

    async fn get_group(&self, id: &str) -> Result<StudyGroupDto, ClientError>;

    async fn create_group(&self, request: CreateGroupRequest)
        -> Result<StudyGroupDto, ClientError>;

    async fn update_group(
        &self,
        id: &str,
        request: UpdateGroupRequest,
    ) -> Result<StudyGroupDto, ClientError>;

    async fn delete_group(&self, id: &str) -> Result<(), ClientError>;

    async fn join_group(
        &self,
        id: &str,
        request: JoinRequest,
    ) -> Result<StudyGroupDto, ClientError>;

    async fn leave_group(
        &self,
        id: &str,
        request: LeaveRequest,
    ) -> Result<LeaveResponse, ClientError>;
}

/// reqwest-backed client for a running server.
pub struct HttpClient {
    base: String,
    http: reqwest::Client,
}

impl HttpClient {
    pub fn new(server: &str) -> Self {
        Self {
            base: format!("{}{}", server.trim_end_matches('/'), API_BASE),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

/// Turn a non-2xx response into [`ClientError::Api`], preferring the server's own message.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Unexpected response")
            .to_string(),
    };
    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    Ok(check(response).await?.json::<T>().await?)
}

#[async_trait]
impl StudyGroupClient for HttpClient {
    async fn list_groups(&self) -> Result<Vec<StudyGroupDto>, ClientError> {
        decode(self.http.get(self.url("")).send().await?).await
    }

    async fn search_groups(&self, course: &str) -> Result<Vec<StudyGroupDto>, ClientError> {
        let body = SearchRequest {
            course: Some(course.to_string()),
        };
        decode(self.http.post(self.url("/search")).json(&body).send().await?).await
    }

    async fn get_group(&self, id: &str) -> Result<StudyGroupDto, ClientError> {
        decode(self.http.get(self.url(&format!("/{}", id))).send().await?).await
    }

    async fn create_group(
        &self,
        request: CreateGroupRequest,
    ) -> Result<StudyGroupDto, ClientError> {
        decode(self.http.post(self.url("")).json(&request).send().await?).await
    }

    async fn update_group(
        &self,
        id: &str,
        request: UpdateGroupRequest,
    ) -> Result<StudyGroupDto, ClientError> {
        let url = self.url(&format!("/{}", id));
        decode(self.http.put(url).json(&request).send().await?).await
    }

    async fn delete_group(&self, id: &str) -> Result<(), ClientError> {
        let url = self.url(&format!("/{}", id));
        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn join_group(
        &self,
        id: &str,
        request: JoinRequest,
    ) -> Result<StudyGroupDto, ClientError> {
        let url = self.url(&format!("/{}/join", id));
        decode(self.http.post(url).json(&request).send().await?).await
    }

    async fn leave_group(
        &self,
        id: &str,
        request: LeaveRequest,
    ) -> Result<LeaveResponse, ClientError> {
        let url = self.url(&format!("/{}/leave", id));
        decode(self.http.post(url).json(&request).send().await?).await
    }
}
