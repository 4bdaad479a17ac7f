//! HTTP transport and envelope unwrapping

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use dispatch_model::Envelope;
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// JSON client bound to one backend
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ApiConfig>,
}

impl ApiClient {
    /// Build a client for `config`
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            http,
            config: Arc::new(config),
        }
    }

    /// Settings this client was built with
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// `GET path`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.send::<Value>(Method::GET, path, &[], None).await
    }

    /// `GET path` with query parameters, percent-encoded
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn get_query(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<Value> {
        self.send::<Value>(Method::GET, path, query, None).await
    }

    /// `POST path` with a JSON body
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn post<B>(&self, path: &str, body: &B) -> ApiResult<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    /// `PUT path` with a JSON body
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn put<B>(&self, path: &str, body: &B) -> ApiResult<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    /// `PATCH path` with a JSON body
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn patch<B>(&self, path: &str, body: &B) -> ApiResult<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.send(Method::PATCH, path, &[], Some(body)).await
    }

    /// `DELETE path`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.send::<Value>(Method::DELETE, path, &[], None).await
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
    ) -> ApiResult<Value>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.config.url(path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            warn!(%method, path, error = %err, "backend unreachable");
            ApiError::network(path, &err)
        })?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| ApiError::network(path, &err))?;

        debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "backend call"
        );

        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| {
                    format!(
                        "HTTP {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("error")
                    )
                });
            return Err(ApiError::RequestFailed {
                path: path.to_string(),
                status: Some(status.as_u16()),
                message,
            });
        }

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|err| ApiError::malformed(path, err))
    }
}

/// Absolute resource path built from `segments`, each percent-encoded
///
/// `resource_path(&["orders", "o#1"])` is `/orders/o%231`.
#[must_use]
pub fn resource_path(segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://backend/") else {
        return format!("/{}", segments.join("/"));
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error")
        .or_else(|| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Payload of a success envelope that must carry `data`
///
/// # Errors
/// - `RequestFailed` for an error envelope or a success without data
/// - `MalformedResponse` when the body is not an envelope of `T`
pub fn required_data<T: DeserializeOwned>(path: &str, body: Value) -> ApiResult<T> {
    decode_envelope::<T>(path, body)?.ok_or_else(|| ApiError::RequestFailed {
        path: path.to_string(),
        status: None,
        message: "response carried no data".to_string(),
    })
}

/// List payload of a success envelope; absent `data` reads as empty
///
/// # Errors
/// Same as [`required_data`], except a missing list is not an error.
pub fn list_data<T: DeserializeOwned>(path: &str, body: Value) -> ApiResult<Vec<T>> {
    Ok(decode_envelope::<Vec<T>>(path, body)?.unwrap_or_default())
}

/// Accept any body that is not an explicit failure
///
/// Mutation and OTP endpoints may answer with an envelope, a bare object or
/// nothing at all.
///
/// # Errors
/// `RequestFailed` when the body carries `status: "error"`.
pub fn acknowledged(path: &str, body: &Value) -> ApiResult<()> {
    match body.get("status").and_then(Value::as_str) {
        Some("error") => Err(ApiError::RequestFailed {
            path: path.to_string(),
            status: None,
            message: error_message(body).unwrap_or_else(|| "backend reported an error".to_string()),
        }),
        _ => Ok(()),
    }
}

fn decode_envelope<T: DeserializeOwned>(path: &str, body: Value) -> ApiResult<Option<T>> {
    let envelope: Envelope<T> =
        serde_json::from_value(body).map_err(|err| ApiError::malformed(path, err))?;
    envelope.into_result().map_err(|message| ApiError::RequestFailed {
        path: path.to_string(),
        status: None,
        message,
    })
}
