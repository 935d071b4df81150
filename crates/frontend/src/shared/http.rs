//! JSON over HTTP for both backends.
//!
//! Every request carries `Authorization: Bearer <token>` when a session is stored.
//! Non-2xx answers are turned into [`ApiError`]; 401 and 404 get their own variants
//! so views can react to them without parsing messages.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::api_utils::{api_base, join_url};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("Failed to send request: {0}")]
    Network(String),
    #[error("{message}")]
    Http { status: u16, message: String },
    #[error("Not found")]
    NotFound,
    #[error("Session expired, please sign in again")]
    Unauthorized,
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to serialize request: {0}")]
    Serialize(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::NotFound => Some(404),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

/// Client bound to one backend base URL
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    token: fn() -> Option<String>,
}

fn no_token() -> Option<String> {
    None
}

impl ApiClient {
    /// `configured` may be empty, see [`api_base`]
    pub fn new(configured: &str) -> Self {
        Self {
            base_url: api_base(configured),
            token: no_token,
        }
    }

    /// Token is read on every request, so login/logout take effect immediately
    pub fn with_token(mut self, token: fn() -> Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder.header("Accept", "application/json");
        match (self.token)() {
            Some(token) if !token.is_empty() => {
                builder.header("Authorization", &format!("Bearer {}", token))
            }
            _ => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = self
            .authorize(Request::get(&url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(response).await
    }

    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("POST {}", url);
        let request = self
            .authorize(Request::post(&url))
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(response).await
    }

    pub async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("PUT {}", url);
        let request = self
            .authorize(Request::put(&url))
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(response).await
    }

    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        log::debug!("PATCH {}", url);
        let request = self
            .authorize(Request::patch(&url))
            .json(body)
            .map_err(|e| ApiError::Serialize(e.to_string()))?;
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(response).await
    }

    /// DELETE; the response body is ignored
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        log::debug!("DELETE {}", url);
        let response = self
            .authorize(Request::delete(&url))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        check_status(&response).await
    }
}

async fn check_status(response: &Response) -> Result<(), ApiError> {
    let status = response.status();
    if response.ok() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(error_for_status(status, &body))
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    check_status(&response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// Map a failed status and its body to an error
pub fn error_for_status(status: u16, body: &str) -> ApiError {
    match status {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound,
        _ => ApiError::Http {
            status,
            message: error_message(status, body),
        },
    }
}

/// Backends answer errors as `{"error": "..."}` or `{"message": "..."}`
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["error", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {}", status))
}
