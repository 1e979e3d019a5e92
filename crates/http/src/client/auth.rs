//! Authentication API client methods

use super::{ClientError, StayNestClient};
use staynest_core::types::{LoginRequest, SignupRequest, TokenResponse, UserProfile};
use staynest_core::Credentials;
use tracing::debug;

impl StayNestClient {
    /// Exchange credentials for an access token.
    ///
    /// The refresh token comes back as a cookie; the client's jar saves it
    /// to storage so later runs can refresh too.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/auth/login")
            .json(request);
        self.execute(req).await
    }

    /// Register a new account
    pub async fn signup(&self, request: &SignupRequest) -> Result<UserProfile, ClientError> {
        let req = self
            .request(reqwest::Method::POST, "/auth/signup")
            .json(request);
        self.execute(req).await
    }

    /// Refresh the access token explicitly and store it
    pub async fn refresh(&self) -> Result<TokenResponse, ClientError> {
        let access_token = self.fetch_refreshed_token().await?;
        Credentials::new(self.storage.as_ref()).set_access_token(&access_token)?;
        debug!("Stored refreshed access token");
        Ok(TokenResponse { access_token })
    }
}
