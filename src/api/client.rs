use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::Ack;

/// HTTP client bound to one backend origin. Every request carries the
/// session cookie held in `jar`.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
    request_logging: bool,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("request_logging", &self.request_logging)
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }
        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .user_agent(concat!("diginotes-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            jar,
            request_logging: false,
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let mut client = Self::new(&config.api.base_url)?;
        client.request_logging = config.api.request_logging;
        Ok(client)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Seed the jar from a previously saved `Cookie` header (`a=1; b=2`)
    pub fn restore_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| p.contains('=')) {
            self.jar
                .add_cookie_str(&format!("{}; Path=/", pair), &self.base_url);
        }
    }

    /// Current `Cookie` header for the backend origin, if any cookie is set
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .cookies(&self.base_url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
            .filter(|s| !s.is_empty())
    }

    /// Append `segments` to the base path. Each segment is percent-encoded
    /// on its own, so an id can never reach another route.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidPath(bad.to_string()));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidPath(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and decode a JSON success body
    pub(crate) async fn send_json<T, F>(&self, method: Method, path: &[&str], build: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder + Send,
    {
        let body = self.execute(method, path, build).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Send a request whose success body only carries an optional message
    pub(crate) async fn send_ack<F>(&self, method: Method, path: &[&str], build: F) -> Result<Ack, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder + Send,
    {
        let body = self.execute(method, path, build).await?;
        Ok(Ack::from_body(&body))
    }

    async fn execute<F>(&self, method: Method, path: &[&str], build: F) -> Result<String, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder + Send,
    {
        let url = self.endpoint(path)?;
        let path = url.path().to_string();
        if self.request_logging {
            tracing::info!(%method, %path, "request");
        } else {
            tracing::debug!(%method, %path, "request");
        }

        let response = build(self.http.request(method.clone(), url)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        let message = backend_message(&body);
        tracing::warn!(%method, %path, status = status.as_u16(), message = ?message, "request rejected");
        Err(ApiError::from_status(status.as_u16(), message))
    }
}

/// Pull the human-readable reason out of an error body
fn backend_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}
