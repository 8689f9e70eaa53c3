//! Common test helpers and utilities for server tests.

use chrono::{Duration, NaiveDate, Utc};
use pumapal_api::{CreateGroupRequest, JoinRequest, API_BASE};
use pumapal_store_sqlite::SqliteStore;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::backend::StoreBackend;
use crate::config::ServerConfig;
use crate::handlers;
use crate::server::PumaPalServer;

/// Test helper: Create a PumaPalServer with in-memory SQLite
pub async fn create_test_server() -> PumaPalServer {
    let store = Arc::new(SqliteStore::open_in_memory().await.unwrap());
    PumaPalServer::new(StoreBackend::Sqlite(store), ServerConfig::default())
}

/// A running router on an ephemeral port.
pub struct TestApp {
    pub server: PumaPalServer,
    pub client: reqwest::Client,
    /// `http://127.0.0.1:<port>`
    pub origin: String,
}

impl TestApp {
    /// Absolute URL under the study group API base.
    pub fn api(&self, path: &str) -> String {
        format!("{}{}{}", self.origin, API_BASE, path)
    }

    pub async fn create(&self, body: &Value) -> reqwest::Response {
        self.client.post(self.api("")).json(body).send().await.unwrap()
    }

    pub async fn join(&self, id: &str, name: &str, email: &str) -> reqwest::Response {
        self.client
            .post(self.api(&format!("/{}/join", id)))
            .json(&json!({ "name": name, "email": email }))
            .send()
            .await
            .unwrap()
    }

    pub async fn leave(&self, id: &str, email: &str) -> reqwest::Response {
        self.client
            .post(self.api(&format!("/{}/leave", id)))
            .json(&json!({ "email": email }))
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, id: &str) -> reqwest::Response {
        self.client
            .get(self.api(&format!("/{}", id)))
            .send()
            .await
            .unwrap()
    }
}

/// Test helper: serve the full router over in-memory SQLite
pub async fn spawn_app() -> TestApp {
    let server = create_test_server().await;
    let app = handlers::router(server.clone(), None);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        server,
        client: reqwest::Client::new(),
        origin: format!("http://{}", addr),
    }
}

pub fn days_from_today(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}

/// JSON body for a valid create, meeting a week from today.
pub fn create_body(course: &str, name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "course": course,
        "campus": "West",
        "meetingTime": "18:30",
        "date": days_from_today(7).to_string(),
    })
}

/// Typed create request for service-level tests.
pub fn create_request(course: &str, email: &str, date: NaiveDate) -> CreateGroupRequest {
    CreateGroupRequest {
        name: Some("Owner".to_string()),
        email: Some(email.to_string()),
        course: Some(course.to_string()),
        campus: Some("East".to_string()),
        meeting_time: Some("10:00 AM".to_string()),
        date: Some(date.to_string()),
        ..Default::default()
    }
}

pub fn join_request(name: &str, email: &str) -> JoinRequest {
    JoinRequest {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
    }
}
