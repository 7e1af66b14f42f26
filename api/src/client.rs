//! HTTP client for the capture backend.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::images::{self, PollOptions, PollOutcome};
use crate::session::{Session, TokenPair};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    session: Session,
}

#[derive(Serialize)]
struct LoginPayload<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterPayload<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub fn new(config: ApiConfig, session: Session) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.access_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Ask the backend to capture a fresh sample image. Best effort: the
    /// caller records a failure and keeps polling, since the sensor may
    /// still produce an image out-of-band.
    pub async fn trigger_capture(&self) -> Result<(), ApiError> {
        let url = self.config.endpoint("upload/");
        debug!(%url, "triggering capture");
        let response = self
            .authorized(self.http.post(&url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        if response.status().is_success() {
            Ok(())
        } else {
            let err = ApiError::from_response(response).await;
            warn!(%err, "capture trigger refused");
            Err(err)
        }
    }

    /// One probe of the images listing. `Ok(None)` when the payload holds
    /// no usable record yet. Relative locators come back absolutized
    /// against the configured origin.
    pub async fn latest_image(&self) -> Result<Option<String>, ApiError> {
        let url = self.config.endpoint("images/");
        let response = self
            .authorized(self.http.get(&url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        let payload: Value = response
            .json()
            .await
            .map_err(|err| ApiError::UnexpectedShape(err.to_string()))?;
        Ok(images::latest_image_locator(&payload)
            .map(|locator| images::absolutize(self.config.base(), &locator)))
    }

    /// Repeated probes under a timeout; see [`images::poll_for_image`].
    pub async fn poll_for_image(&self, opts: &PollOptions, cancel: &CancelToken) -> PollOutcome {
        images::poll_for_image(self, opts, cancel).await
    }

    /// Exchange credentials for a token pair and store it on the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, ApiError> {
        let url = self.config.endpoint("token/");
        let response = self
            .http
            .post(&url)
            .json(&LoginPayload { username, password })
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        let tokens: TokenPair = response
            .json()
            .await
            .map_err(|err| ApiError::UnexpectedShape(err.to_string()))?;
        self.session.set_tokens(tokens.clone());
        debug!("session authenticated");
        Ok(tokens)
    }

    /// Create an account. Backend field errors surface in the status detail.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let url = self.config.endpoint("register/");
        let response = self
            .http
            .post(&url)
            .json(&RegisterPayload {
                username,
                email,
                password,
            })
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::from_response(response).await)
        }
    }

    /// Fetch raw bytes for a sample image so the report can inline it.
    /// Supports `data:` URIs alongside http(s) locators.
    pub async fn fetch_image_bytes(&self, locator: &str) -> Result<Vec<u8>, ApiError> {
        if let Some(bytes) = decode_data_uri(locator) {
            return Ok(bytes);
        }
        let response = self
            .authorized(self.http.get(locator))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        let bytes = response.bytes().await.map_err(ApiError::from_reqwest)?;
        Ok(bytes.to_vec())
    }
}

/// Decode `data:<mime>;base64,<payload>` URIs. Text-encoded data URIs are
/// not produced by the backend and fall through to `None`.
fn decode_data_uri(locator: &str) -> Option<Vec<u8>> {
    use base64::Engine as _;

    let rest = locator.strip_prefix("data:")?;
    let (_, payload) = rest.split_once(";base64,")?;
    base64::engine::general_purpose::STANDARD.decode(payload).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uris_decode_to_their_payload() {
        let bytes = decode_data_uri("data:image/png;base64,aGVsbG8=");
        assert_eq!(bytes.as_deref(), Some(b"hello".as_slice()));
    }

    #[test]
    fn non_base64_locators_fall_through() {
        assert!(decode_data_uri("data:image/svg+xml,%3Csvg%3E").is_none());
        assert!(decode_data_uri("http://example.com/x.png").is_none());
    }
}
