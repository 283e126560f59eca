//! REST access to the timeline backend.

/// HTTP implementation of [`TimelineApi`].
pub mod client;

use async_trait::async_trait;

use crate::models::{
    CreatedResponse, Era, EraDraft, Event, EventDraft, HealthStatus, RegenerateResponse,
    TimelineConfig, TimelineDocument,
};

pub use client::{ApiClient, ApiError};

/// Relative endpoint paths appended to the configured API base.
pub mod endpoints {
    /// Title and scale settings.
    pub const CONFIG: &str = "/config";
    /// Event collection.
    pub const EVENTS: &str = "/events";
    /// Era collection.
    pub const ERAS: &str = "/eras";
    /// Materialized document (GET) and regeneration trigger (POST).
    pub const GENERATE_JSON: &str = "/generate-json";
    /// Raw export download.
    pub const EXPORT: &str = "/export";
    /// Liveness probe.
    pub const HEALTH: &str = "/health";

    /// Path of a single event.
    pub fn event(id: i64) -> String {
        format!("{EVENTS}/{id}")
    }

    /// Path of a single era.
    pub fn era(id: i64) -> String {
        format!("{ERAS}/{id}")
    }
}

/// Typed operations against the timeline backend.
///
/// Every call is a single request with no retry; failures surface as
/// [`ApiError`] and are handled by the caller.
#[async_trait]
pub trait TimelineApi: Send + Sync {
    /// `GET /config`; `None` when the backend has no configuration row.
    async fn fetch_config(&self) -> Result<Option<TimelineConfig>, ApiError>;

    /// `PUT /config`.
    async fn update_config(&self, config: &TimelineConfig) -> Result<(), ApiError>;

    /// `GET /events`.
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    /// `GET /events/{id}`.
    async fn get_event(&self, id: i64) -> Result<Event, ApiError>;

    /// `POST /events`.
    async fn create_event(&self, draft: &EventDraft) -> Result<CreatedResponse, ApiError>;

    /// `PUT /events/{id}`.
    async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<(), ApiError>;

    /// `DELETE /events/{id}`.
    async fn delete_event(&self, id: i64) -> Result<(), ApiError>;

    /// `GET /eras`.
    async fn list_eras(&self) -> Result<Vec<Era>, ApiError>;

    /// `POST /eras`.
    async fn create_era(&self, draft: &EraDraft) -> Result<CreatedResponse, ApiError>;

    /// `PUT /eras/{id}`.
    async fn update_era(&self, id: i64, draft: &EraDraft) -> Result<(), ApiError>;

    /// `DELETE /eras/{id}`.
    async fn delete_era(&self, id: i64) -> Result<(), ApiError>;

    /// `POST /generate-json`: rebuild the published document and return it.
    async fn regenerate(&self) -> Result<RegenerateResponse, ApiError>;

    /// `GET /generate-json`: the document as it would be published now.
    async fn fetch_document(&self) -> Result<TimelineDocument, ApiError>;

    /// `GET /export`: raw export bytes.
    async fn export(&self) -> Result<Vec<u8>, ApiError>;

    /// `GET /health`.
    async fn health(&self) -> Result<HealthStatus, ApiError>;
}
