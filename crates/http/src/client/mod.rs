//! StayNest HTTP client

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod config;
mod cookies;
pub mod error;
pub mod hotels;
mod redirect;
pub mod users;

pub use config::ClientConfig;
pub use redirect::{LoginRedirect, NoRedirect};

#[cfg(test)]
use redirect::MockLoginRedirect;

use crate::types::{Envelope, error_message};
use cookies::PersistentJar;
use error::ClientError;
use reqwest::header::{self, HeaderValue};
use reqwest::{Client, ClientBuilder, Request, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use staynest_core::types::TokenResponse;
use staynest_core::{Credentials, KeyValueStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Paths that must never carry a bearer token or trigger a refresh
const PUBLIC_AUTH_PATHS: [&str; 2] = ["/auth/login", "/auth/signup"];

const REFRESH_PATH: &str = "/auth/refresh";

/// StayNest API client
#[derive(Clone)]
pub struct StayNestClient {
    client: Client,
    base_url: String,
    storage: Arc<dyn KeyValueStore>,
    redirect: Arc<dyn LoginRedirect>,
    refresh_gate: Arc<Mutex<()>>,
}

impl std::fmt::Debug for StayNestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StayNestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl StayNestClient {
    /// Create a new client with default configuration
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().base_url(base_url).build()
    }

    /// Create a new client builder
    pub fn builder() -> StayNestClientBuilder {
        StayNestClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Create a request builder for an API path.
    ///
    /// Credentials are attached by [`send`](Self::send), right before the
    /// request leaves.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send a request through the auth interceptor.
    ///
    /// Attaches the stored access token, and on a 401 refreshes it once and
    /// replays the request once with the new token. The replayed response is
    /// returned whatever its status.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let mut request = request.build()?;
        let public = is_public_auth_path(request.url().path());

        let token = if public {
            None
        } else {
            Credentials::new(self.storage.as_ref()).access_token()?
        };
        if let Some(token) = &token {
            set_bearer(&mut request, token)?;
        }

        let replay = request.try_clone();
        let response = self.client.execute(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED || public {
            return Ok(response);
        }

        let Some(mut replay) = replay else {
            warn!("Request body cannot be replayed, returning 401 as-is");
            return Ok(response);
        };

        debug!(path = replay.url().path(), "Access token rejected, refreshing");
        let fresh = self.refresh_token(token.as_deref()).await?;
        set_bearer(&mut replay, &fresh)?;
        Ok(self.client.execute(replay).await?)
    }

    /// Execute a request and decode the (possibly enveloped) JSON body
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            let envelope: Envelope<T> = serde_json::from_slice(&body)?;
            Ok(envelope.into_inner())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Execute a request whose response body is irrelevant
    pub async fn execute_empty(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let response = self.send(request).await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Obtain a new access token after `stale` was rejected.
    ///
    /// Concurrent callers queue on one gate; whoever comes second finds a
    /// different token in storage and reuses it instead of refreshing again.
    async fn refresh_token(&self, stale: Option<&str>) -> Result<String, ClientError> {
        let _gate = self.refresh_gate.lock().await;
        let credentials = Credentials::new(self.storage.as_ref());

        match credentials.access_token()? {
            Some(current) if stale != Some(current.as_str()) => {
                debug!("Access token already refreshed by a concurrent request");
                return Ok(current);
            }
            None if stale.is_some() => {
                debug!("Session already ended by a concurrent refresh");
                return Err(ClientError::SessionExpired(
                    "session ended while waiting for token refresh".into(),
                ));
            }
            _ => {}
        }

        match self.fetch_refreshed_token().await {
            Ok(token) => {
                credentials.set_access_token(&token)?;
                info!("Access token refreshed");
                Ok(token)
            }
            Err(e) => {
                warn!("Token refresh failed: {e}");
                if let Err(e) = credentials.clear() {
                    warn!("Failed to clear stored credentials: {e}");
                }
                self.redirect.redirect_to_login();
                Err(ClientError::SessionExpired(e.to_string()))
            }
        }
    }

    /// Plain cookie-authenticated refresh call, outside the interceptor
    async fn fetch_refreshed_token(&self) -> Result<String, ClientError> {
        let response = self.client.get(self.url(REFRESH_PATH)).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body = response.bytes().await?;
        let token = serde_json::from_slice::<Envelope<TokenResponse>>(&body)?
            .into_inner()
            .access_token;
        if token.is_empty() {
            return Err(ClientError::AuthenticationFailed(
                "refresh response carried no access token".into(),
            ));
        }
        Ok(token)
    }
}

fn is_public_auth_path(path: &str) -> bool {
    PUBLIC_AUTH_PATHS.iter().any(|public| path.contains(public))
}

fn set_bearer(request: &mut Request, token: &str) -> Result<(), ClientError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
        ClientError::Configuration("stored access token is not a valid header value".into())
    })?;
    value.set_sensitive(true);
    request.headers_mut().insert(header::AUTHORIZATION, value);
    Ok(())
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status.to_string()
        } else {
            body
        }
    });
    ClientError::from_status(status, message)
}

/// Builder for StayNestClient
#[derive(Default)]
pub struct StayNestClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    storage: Option<Arc<dyn KeyValueStore>>,
    redirect: Option<Arc<dyn LoginRedirect>>,
}

impl StayNestClientBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the credential storage (in-memory by default); it also keeps the
    /// refresh cookie between runs
    pub fn storage(mut self, storage: Arc<dyn KeyValueStore>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the hook run when the session can no longer be refreshed
    pub fn redirect(mut self, redirect: Arc<dyn LoginRedirect>) -> Self {
        self.redirect = Some(redirect);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<StayNestClient, ClientError> {
        let base_url = self
            .base_url
            .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?;

        // Ensure base_url ends without a trailing slash
        let base_url = base_url.trim_end_matches('/').to_string();
        let refresh_url = url::Url::parse(&format!("{base_url}{REFRESH_PATH}"))
            .map_err(|e| ClientError::Configuration(format!("invalid base_url '{base_url}': {e}")))?;

        let storage = self
            .storage
            .unwrap_or_else(|| Arc::new(MemoryStore::new()));
        let cookies = Arc::new(PersistentJar::restore(storage.clone(), refresh_url));
        let mut client_builder = ClientBuilder::new().cookie_provider(cookies);

        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }

        if let Some(user_agent) = self.user_agent {
            client_builder = client_builder.user_agent(user_agent);
        } else {
            client_builder = client_builder.user_agent("staynest-client/0.1.0");
        }

        let client = client_builder.build()?;

        Ok(StayNestClient {
            client,
            base_url,
            storage,
            redirect: self.redirect.unwrap_or_else(|| Arc::new(NoRedirect)),
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staynest_core::keys;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_public_auth_paths() {
        assert!(is_public_auth_path("/api/v1/auth/login"));
        assert!(is_public_auth_path("/api/v1/auth/signup"));
        assert!(!is_public_auth_path("/api/v1/auth/refresh"));
        assert!(!is_public_auth_path("/api/v1/users/profile"));
    }

    #[test]
    fn test_builder_validates_base_url() {
        assert!(matches!(
            StayNestClient::builder().build(),
            Err(ClientError::Configuration(_))
        ));
        assert!(matches!(
            StayNestClient::new("not a url"),
            Err(ClientError::Configuration(_))
        ));
        let client = StayNestClient::new("http://localhost:8080/api/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api/v1");
    }

    #[tokio::test]
    async fn test_failed_refresh_redirects_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profile"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::ACCESS_TOKEN, "expired").unwrap();
        storage.set(keys::USER, "{}").unwrap();

        let mut redirect = MockLoginRedirect::new();
        redirect.expect_redirect_to_login().times(1).return_const(());

        let client = StayNestClient::builder()
            .base_url(server.uri())
            .storage(storage.clone())
            .redirect(Arc::new(redirect))
            .build()
            .unwrap();

        let result = client
            .execute_empty(client.request(reqwest::Method::GET, "/users/profile"))
            .await;

        assert!(matches!(result, Err(ClientError::SessionExpired(_))));
        assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
        assert_eq!(storage.get(keys::USER).unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_is_not_repeated_by_queued_callers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::ACCESS_TOKEN, "old").unwrap();

        let mut redirect = MockLoginRedirect::new();
        redirect.expect_redirect_to_login().times(1).return_const(());

        let client = StayNestClient::builder()
            .base_url(server.uri())
            .storage(storage.clone())
            .redirect(Arc::new(redirect))
            .build()
            .unwrap();

        let (first, second) = tokio::join!(
            client.refresh_token(Some("old")),
            client.refresh_token(Some("old")),
        );

        assert!(matches!(first, Err(ClientError::SessionExpired(_))));
        assert!(matches!(second, Err(ClientError::SessionExpired(_))));
        assert_eq!(storage.get(keys::ACCESS_TOKEN).unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_one_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/guests"))
            .and(header("Authorization", "Bearer old"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/guests"))
            .and(header("Authorization", "Bearer new"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/refresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "accessToken": "new" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        storage.set(keys::ACCESS_TOKEN, "old").unwrap();

        let mut redirect = MockLoginRedirect::new();
        redirect.expect_redirect_to_login().never();

        let client = StayNestClient::builder()
            .base_url(server.uri())
            .storage(storage.clone())
            .redirect(Arc::new(redirect))
            .build()
            .unwrap();

        let (first, second) = tokio::join!(
            client.execute::<Vec<serde_json::Value>>(
                client.request(reqwest::Method::GET, "/users/guests")
            ),
            client.execute::<Vec<serde_json::Value>>(
                client.request(reqwest::Method::GET, "/users/guests")
            ),
        );

        assert!(first.unwrap().is_empty());
        assert!(second.unwrap().is_empty());
        assert_eq!(
            storage.get(keys::ACCESS_TOKEN).unwrap().as_deref(),
            Some("new")
        );
    }
}
