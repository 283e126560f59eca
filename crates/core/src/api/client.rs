use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{endpoints, TimelineApi};
use crate::models::{
    CreatedResponse, Era, EraDraft, Event, EventDraft, HealthStatus, RegenerateResponse,
    TimelineConfig, TimelineDocument,
};

/// JSON-over-HTTP client bound to a fixed API base.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    hard_delete: bool,
}

impl ApiClient {
    /// Create a client for the given API root, e.g. `http://localhost:8000/api`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            hard_delete: false,
        })
    }

    /// Ask the backend to remove rows instead of flagging them inactive.
    pub fn with_hard_delete(mut self, enabled: bool) -> Self {
        self.hard_delete = enabled;
        self
    }

    /// API root every relative path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base unless it is already absolute.
    pub fn url(&self, path: &str) -> String {
        if is_absolute(path) {
            path.to_string()
        } else {
            format!("{}{}", self.base_url, path)
        }
    }

    /// Issue a JSON request and decode the JSON reply.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(path, method, payload).await?;
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(ApiError::Decode)
    }

    /// Issue a `GET` and return the raw body.
    pub async fn request_bytes(&self, path: &str) -> Result<Vec<u8>, ApiError> {
        let response = self.send(path, Method::GET, None).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(
        &self,
        path: &str,
        method: Method,
        payload: Option<Value>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);
        debug!(%method, %url, "api request");

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(payload) = payload {
            builder = builder.body(serde_json::to_vec(&payload).map_err(ApiError::Encode)?);
        }

        let response = builder.send().await.map_err(|err| {
            warn!(%method, %url, error = %err, "api request could not be sent");
            ApiError::Network(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%method, %url, status = status.as_u16(), "api request rejected");
            return Err(ApiError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }
        Ok(response)
    }

    fn delete_path(&self, path: String) -> String {
        if self.hard_delete {
            format!("{path}?soft=false")
        } else {
            path
        }
    }
}

#[async_trait]
impl TimelineApi for ApiClient {
    async fn fetch_config(&self) -> Result<Option<TimelineConfig>, ApiError> {
        self.request(endpoints::CONFIG, Method::GET, None).await
    }

    async fn update_config(&self, config: &TimelineConfig) -> Result<(), ApiError> {
        self.request::<Value>(endpoints::CONFIG, Method::PUT, Some(to_body(config)?))
            .await
            .map(drop)
    }

    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        self.request(endpoints::EVENTS, Method::GET, None).await
    }

    async fn get_event(&self, id: i64) -> Result<Event, ApiError> {
        self.request(&endpoints::event(id), Method::GET, None).await
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<CreatedResponse, ApiError> {
        self.request(endpoints::EVENTS, Method::POST, Some(to_body(draft)?))
            .await
    }

    async fn update_event(&self, id: i64, draft: &EventDraft) -> Result<(), ApiError> {
        self.request::<Value>(&endpoints::event(id), Method::PUT, Some(to_body(draft)?))
            .await
            .map(drop)
    }

    async fn delete_event(&self, id: i64) -> Result<(), ApiError> {
        let path = self.delete_path(endpoints::event(id));
        self.request::<Value>(&path, Method::DELETE, None)
            .await
            .map(drop)
    }

    async fn list_eras(&self) -> Result<Vec<Era>, ApiError> {
        self.request(endpoints::ERAS, Method::GET, None).await
    }

    async fn create_era(&self, draft: &EraDraft) -> Result<CreatedResponse, ApiError> {
        self.request(endpoints::ERAS, Method::POST, Some(to_body(draft)?))
            .await
    }

    async fn update_era(&self, id: i64, draft: &EraDraft) -> Result<(), ApiError> {
        self.request::<Value>(&endpoints::era(id), Method::PUT, Some(to_body(draft)?))
            .await
            .map(drop)
    }

    async fn delete_era(&self, id: i64) -> Result<(), ApiError> {
        let path = self.delete_path(endpoints::era(id));
        self.request::<Value>(&path, Method::DELETE, None)
            .await
            .map(drop)
    }

    async fn regenerate(&self) -> Result<RegenerateResponse, ApiError> {
        self.request(endpoints::GENERATE_JSON, Method::POST, None)
            .await
    }

    async fn fetch_document(&self) -> Result<TimelineDocument, ApiError> {
        self.request(endpoints::GENERATE_JSON, Method::GET, None)
            .await
    }

    async fn export(&self) -> Result<Vec<u8>, ApiError> {
        self.request_bytes(endpoints::EXPORT).await
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.request(endpoints::HEALTH, Method::GET, None).await
    }
}

/// The single failure kind surfaced to the console.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered outside the 2xx range.
    #[error("HTTP {status}: {status_text}")]
    Status {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The request never produced a response.
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    /// The response body was not the expected JSON.
    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The payload could not be serialized.
    #[error("invalid request body: {0}")]
    Encode(#[source] serde_json::Error),
}

fn to_body<P: Serialize>(payload: &P) -> Result<Value, ApiError> {
    serde_json::to_value(payload).map_err(ApiError::Encode)
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Scale;
    use anyhow::Result;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
        task::JoinHandle,
    };

    /// Accept one connection, capture the raw request and answer with `response`.
    async fn serve_once(response: impl Into<String>) -> Result<(String, JoinHandle<String>)> {
        let response = response.into();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;
            socket
                .write_all(response.as_bytes())
                .await
                .expect("write response");
            let _ = socket.shutdown().await;
            request
        });
        Ok((format!("http://{addr}/api"), handle))
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.expect("read request");
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= pos + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    #[test]
    fn resolves_relative_and_absolute_paths() -> Result<()> {
        let client = ApiClient::new("http://localhost:8000/api/")?;
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/events"), "http://localhost:8000/api/events");
        assert_eq!(
            client.url("https://mirror.example/events"),
            "https://mirror.example/events"
        );
        assert_eq!(endpoints::event(3), "/events/3");
        Ok(())
    }

    #[tokio::test]
    async fn non_success_status_becomes_status_error() -> Result<()> {
        let (base, server) = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await?;
        let client = ApiClient::new(base)?;

        let err = client.get_event(9).await.expect_err("404 must fail");
        match &err {
            ApiError::Status {
                status,
                status_text,
            } => {
                assert_eq!(*status, 404);
                assert_eq!(status_text, "Not Found");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let request = server.await?;
        assert!(request.starts_with("GET /api/events/9 "));
        Ok(())
    }

    #[tokio::test]
    async fn update_config_sends_flat_json() -> Result<()> {
        let body = r#"{"status":"success"}"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let (base, server) = serve_once(response).await?;
        let client = ApiClient::new(base)?;

        client
            .update_config(&TimelineConfig {
                title_headline: "Milestones".to_string(),
                title_text: "Steam to silicon".to_string(),
                scale: Scale::Human,
            })
            .await?;

        let request = server.await?;
        assert!(request.starts_with("PUT /api/config "));
        assert!(request
            .to_lowercase()
            .contains("content-type: application/json"));
        assert!(request.contains(r#""title_headline":"Milestones""#));
        assert!(request.contains(r#""scale":"human""#));
        Ok(())
    }

    #[tokio::test]
    async fn hard_delete_adds_soft_flag() -> Result<()> {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}",
        )
        .await?;
        let client = ApiClient::new(base)?.with_hard_delete(true);

        client.delete_event(7).await?;

        let request = server.await?;
        assert!(request.starts_with("DELETE /api/events/7?soft=false "));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() -> Result<()> {
        let (base, server) = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-length: 8\r\nconnection: close\r\n\r\nnot json",
        )
        .await?;
        let client = ApiClient::new(base)?;

        let err = client.list_events().await.expect_err("body is not json");
        assert!(matches!(err, ApiError::Decode(_)));
        server.await?;
        Ok(())
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() -> Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}/api"))?;
        let err = client.health().await.expect_err("nothing is listening");
        assert!(matches!(err, ApiError::Network(_)));
        Ok(())
    }
}
