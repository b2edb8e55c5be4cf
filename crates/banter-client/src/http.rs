use std::sync::Arc;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use banter_storage::{Storage, keys};
use banter_types::SessionSignal;

use crate::error::ApiError;

/// Fixed delay before the single timeout retry.
const RETRY_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Budget for the first attempt of every request.
    pub request_timeout: Duration,
    /// Doubled budget used for the one retry after a timeout.
    pub retry_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".into(),
            request_timeout: Duration::from_secs(30),
            retry_timeout: Duration::from_secs(60),
        }
    }
}

/// The one configured HTTP client every service goes through.
///
/// Responsibilities: attach `Authorization: Bearer` from storage when a
/// token is present, retry exactly once on a client-side timeout, and on a
/// final 401 clear the persisted token and broadcast
/// [`SessionSignal::Expired`] before returning the error.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    storage: Arc<dyn Storage>,
    signals: broadcast::Sender<SessionSignal>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, storage: Arc<dyn Storage>) -> Self {
        let (signals, _) = broadcast::channel(16);
        Self {
            http: reqwest::Client::new(),
            config,
            storage,
            signals,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Subscribe to out-of-band session signals (expiry, idle timeout).
    pub fn subscribe(&self) -> broadcast::Receiver<SessionSignal> {
        self.signals.subscribe()
    }

    /// Emit a session signal to all subscribers.
    pub fn emit(&self, signal: SessionSignal) {
        // No receivers is fine; the signal is advisory.
        let _ = self.signals.send(signal);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    // -- Typed entry points used by the services --

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send(|| self.http.get(&url)).await?;
        Self::json(resp).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send(|| self.http.post(&url).json(body)).await?;
        Self::json(resp).await
    }

    /// POST with no payload and no interesting response body (logout).
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        self.send(|| self.http.post(&url)).await?;
        Ok(())
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        let resp = self.send(|| self.http.put(&url).json(body)).await?;
        Self::json(resp).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        self.send(|| self.http.delete(&url)).await?;
        Ok(())
    }

    /// Multipart POST. Takes a form factory because a retried request needs
    /// a freshly built body.
    pub async fn post_multipart<T, F>(&self, path: &str, form: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::multipart::Form,
    {
        let url = self.url(path);
        let resp = self.send(|| self.http.post(&url).multipart(form())).await?;
        Self::json(resp).await
    }

    /// Core send loop: bearer attachment, per-attempt timeout budget, the
    /// single retry, 401 teardown, and error-body normalization.
    async fn send<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retried = false;
        loop {
            let budget = if retried {
                self.config.retry_timeout
            } else {
                self.config.request_timeout
            };

            let mut request = build().timeout(budget);
            if let Some(token) = self.storage.read(keys::TOKEN) {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(resp) if resp.status() == StatusCode::UNAUTHORIZED => {
                    self.expire_session();
                    return Err(Self::response_error(resp).await);
                }
                Ok(resp) if !resp.status().is_success() => {
                    return Err(Self::response_error(resp).await);
                }
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_timeout() && !retried => {
                    warn!("request timed out, retrying once with a larger budget");
                    retried = true;
                    tokio::time::sleep(RETRY_DELAY).await;
                }
                Err(e) => return Err(ApiError::from_transport(&e)),
            }
        }
    }

    /// Local session teardown on a 401. Runs outside the normal
    /// call/return path; callers also get the error, but subscribers are
    /// told regardless of how the caller handles it.
    fn expire_session(&self) {
        debug!("server rejected credential, clearing session");
        if let Err(e) = self.storage.remove(keys::TOKEN) {
            warn!("failed to clear persisted token: {}", e);
        }
        self.emit(SessionSignal::Expired);
    }

    async fn response_error(resp: Response) -> ApiError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        ApiError::from_response(status, &body)
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        resp.json().await.map_err(|e| ApiError::from_transport(&e))
    }
}
