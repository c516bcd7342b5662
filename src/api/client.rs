//! HTTP client for the deals service.
//!
//! Every call is a single attempt: no retries, caching or de-duplication.
//! Bodies are decoded as JSON before the status code is inspected, and every
//! failure comes back as an [`ApiError`].
//!
//! Paths are joined onto the base URL segment by segment, each one
//! percent-encoded, so a caller-supplied id can never address a different
//! endpoint.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::api::error::ApiError;

const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client rooted at `base_url`. `timeout` is handed to the
    /// transport; `None` waits indefinitely.
    pub fn new(base_url: &Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let mut base_url = base_url.clone();
        if let Ok(mut segments) = base_url.path_segments_mut() {
            segments.pop_if_empty();
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `GET {base}{path}`, with a bearer token when one is supplied
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.get_at(&split_path(path), token).await
    }

    /// `POST {base}{path}` with an optional JSON body
    pub async fn post<T, B>(
        &self,
        path: &str,
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.post_at(&split_path(path), body, token).await
    }

    pub(crate) async fn get_at<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let request = self.request(Method::GET, url.clone(), token);
        self.execute(request, Method::GET, url.path()).await
    }

    pub(crate) async fn post_at<T, B>(
        &self,
        segments: &[&str],
        body: Option<&B>,
        token: Option<&str>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let mut request = self.request(Method::POST, url.clone(), token);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.execute(request, Method::POST, url.path()).await
    }

    /// Base URL extended by `segments`, each percent-encoded as exactly one
    /// path segment. Empty and dot segments are refused before anything is
    /// sent.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(segment) = segments.iter().find(|s| matches!(s.trim(), "" | "." | "..")) {
            let message = format!("Invalid path segment {:?}", segment);
            return Err(ApiError::invalid_request(message));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::invalid_request("Base URL cannot carry a path"))?
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_MEDIA_TYPE)
            .header(ACCEPT, JSON_MEDIA_TYPE);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        debug!("{} {}", method, path);

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed before a response arrived: {}", method, path, e);
            ApiError::transport(None)
        })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| {
            warn!(
                "{} {} returned {} but the body could not be read: {}",
                method, path, status, e
            );
            ApiError::transport(Some(status))
        })?;

        let body = decode_body(&bytes).ok_or_else(|| {
            warn!("{} {} returned {} with a non-JSON body", method, path, status);
            ApiError::transport(Some(status))
        })?;

        if !(200..300).contains(&status) {
            let err = ApiError::from_response(status, body);
            debug!("{} {} -> {}: {}", method, path, status, err.message);
            return Err(err);
        }

        T::deserialize(&body).map_err(|e| {
            warn!("{} {} returned {} with an unexpected body: {}", method, path, status, e);
            ApiError::unexpected_shape(status, body.clone())
        })
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Decode a response body. An empty body is `Null`; anything else must be JSON.
fn decode_body(bytes: &[u8]) -> Option<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Some(Value::Null);
    }
    serde_json::from_slice(bytes).ok()
}
