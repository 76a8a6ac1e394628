use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the OAuth flow itself.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The provider reported an error on the authorization redirect. The
    /// reason is surfaced verbatim; no token exchange is attempted.
    #[error("authorization denied: {0}")]
    ProviderDenied(String),

    #[error("code exchange failed: {0}")]
    ExchangeFailed(String),

    #[error("token refresh failed: {0}")]
    RefreshFailed(String),
}

/// Failures of a single call against the provider's Web API.
#[derive(Debug, Error)]
pub enum RemoteCallError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    BadStatus(StatusCode),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for RemoteCallError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteCallError::Timeout
        } else if err.is_decode() {
            RemoteCallError::MalformedResponse(err.to_string())
        } else {
            RemoteCallError::Transport(err.to_string())
        }
    }
}

/// Failures of the final write-back, split by stage so the caller can report
/// whether the playlist exists empty or is missing its tracks.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("playlist creation failed: {0}")]
    CreateFailed(String),

    #[error("adding tracks failed: {0}")]
    AddTracksFailed(String),
}

impl WriteError {
    pub fn stage(&self) -> &'static str {
        match self {
            WriteError::CreateFailed(_) => "create",
            WriteError::AddTracksFailed(_) => "add-tracks",
        }
    }
}

/// Web-facing error type returned by route handlers.
///
/// Translates the taxonomy into responses: recoverable auth problems become
/// redirects back into the wizard, everything else becomes a JSON error body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Remote(#[from] RemoteCallError),

    #[error(transparent)]
    Write(#[from] WriteError),

    /// No session, or a session with no token at all. Expiry does not land
    /// here; an expired-but-refreshable token is [`ApiError::TokenExpired`].
    #[error("not authenticated")]
    Unauthenticated,

    #[error("access token expired")]
    TokenExpired,

    /// A wizard step was invoked before the step that feeds it.
    #[error("{0}")]
    MissingPipelineState(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Auth(AuthError::ProviderDenied(reason)) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
            }
            // Failed exchanges and refreshes are recoverable by logging in again.
            ApiError::Auth(_) | ApiError::Unauthenticated => {
                Redirect::to("/login").into_response()
            }
            ApiError::TokenExpired => Redirect::to("/refresh-token").into_response(),
            ApiError::Remote(err) => (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response(),
            ApiError::Write(err) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": err.to_string(), "stage": err.stage() })),
            )
                .into_response(),
            ApiError::MissingPipelineState(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}
