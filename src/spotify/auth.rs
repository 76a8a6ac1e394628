use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::Config,
    error::AuthError,
    spotify::client::http_client,
    types::{TokenRecord, TokenRefresh, TokenResponse},
};

/// OAuth 2.0 authorization-code flow against the provider's accounts service.
///
/// The flow is the classic three-legged dance:
/// 1. **Authorize**: the user's browser is redirected to [`AuthFlow::authorize_url`]
///    and grants (or denies) the requested scopes.
/// 2. **Exchange**: the callback code is traded for an access/refresh token
///    pair via [`AuthFlow::exchange_code`].
/// 3. **Refresh**: once the access token expires, [`AuthFlow::refresh`]
///    obtains a fresh one without re-prompting the user.
///
/// Client credentials travel in the form body of both exchanges, as the
/// provider's authorization-code grant expects for confidential clients.
#[derive(Clone)]
pub struct AuthFlow {
    config: Arc<Config>,
    http: Client,
}

impl AuthFlow {
    pub fn new(config: Arc<Config>) -> Self {
        AuthFlow {
            config,
            http: http_client(),
        }
    }

    /// Builds the authorization redirect URL.
    ///
    /// All parameters are query-encoded. The order is fixed (client_id,
    /// response_type, scope, redirect_uri, show_dialog) so the output is
    /// stable for tests; the provider does not care. `show_dialog=true`
    /// forces re-consent so switching accounts stays possible.
    pub fn authorize_url(&self) -> String {
        let mut url = self.config.auth_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scope())
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("show_dialog", "true");
        url.into()
    }

    /// Exchanges an authorization code for a token pair.
    ///
    /// On success the returned [`TokenRecord`] carries
    /// `expires_at = now + expires_in`. Transport failures, non-2xx statuses
    /// and responses missing any required field all fail with
    /// [`AuthError::ExchangeFailed`].
    pub async fn exchange_code(&self, code: &str) -> Result<TokenRecord, AuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::ExchangeFailed(format!("status {status}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ExchangeFailed(e.to_string()))?;

        Ok(TokenRecord::new(
            token.access_token,
            token.refresh_token,
            token.expires_in,
            Utc::now(),
        ))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// The provider may rotate the refresh token; the response's
    /// `refresh_token` is `None` when it does not, and the stored one must
    /// then be kept. Any failure surfaces as [`AuthError::RefreshFailed`].
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRefresh, AuthError> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RefreshFailed(format!("status {status}")));
        }

        response
            .json::<TokenRefresh>()
            .await
            .map_err(|e| AuthError::RefreshFailed(e.to_string()))
    }
}
