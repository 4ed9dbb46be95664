//! Client for the Practicum homework status API.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} is unavailable, response code {status}")]
    Status { endpoint: String, status: u16 },
    #[error("response from {endpoint} is not valid JSON: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Network failures and non-success statuses, as opposed to undecodable bodies.
    pub fn is_transport(&self) -> bool {
        !matches!(self, ApiError::Decode { .. })
    }
}

/// Source of homework status snapshots.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch every status change since `from_date` (unix seconds) as raw JSON.
    async fn fetch(&self, from_date: i64) -> Result<Value, ApiError>;
}

pub struct PracticumClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(token: &str, endpoint: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| ApiError::Request {
                endpoint: endpoint.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ApiClient for PracticumClient {
    async fn fetch(&self, from_date: i64) -> Result<Value, ApiError> {
        debug!(endpoint = %self.endpoint, from_date, "Requesting homework statuses");

        let resp = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|source| ApiError::Request {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|source| ApiError::Request {
            endpoint: self.endpoint.clone(),
            source,
        })?;
        debug!(bytes = body.len(), "Received homework statuses");

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            endpoint: self.endpoint.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::HeaderMap, http::StatusCode, routing::get, Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/homework_statuses/", addr)
    }

    fn client(endpoint: &str) -> PracticumClient {
        PracticumClient::new("secret", endpoint, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_auth_and_cursor() {
        let router = Router::new().route(
            "/homework_statuses/",
            get(
                |headers: HeaderMap, Query(params): Query<HashMap<String, String>>| async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({
                        "homeworks": [],
                        "current_date": 1000,
                        "auth": auth,
                        "from_date": params.get("from_date").cloned().unwrap_or_default(),
                    }))
                },
            ),
        );
        let endpoint = serve(router).await;

        let body = client(&endpoint).fetch(1234).await.unwrap();
        assert_eq!(body["auth"], "OAuth secret");
        assert_eq!(body["from_date"], "1234");
        assert_eq!(body["current_date"], 1000);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let router = Router::new().route(
            "/homework_statuses/",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let endpoint = serve(router).await;

        let err = client(&endpoint).fetch(0).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
        assert!(err.is_transport());
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_fetch_undecodable_body() {
        let router = Router::new().route("/homework_statuses/", get(|| async { "<html>" }));
        let endpoint = serve(router).await;

        let err = client(&endpoint).fetch(0).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/", addr)).fetch(0).await.unwrap_err();
        assert!(matches!(err, ApiError::Request { .. }));
        assert!(err.is_transport());
    }
}
