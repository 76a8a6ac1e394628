//! # API Module
//!
//! HTTP handlers for the wizard routes. Handlers are thin adapters: they
//! resolve the caller's session, consult the auth state machine, run the
//! pipeline components, and translate the outcome into a redirect or a JSON
//! body. No domain logic lives here.
//!
//! ## Endpoints
//!
//! ### Authorization
//!
//! - [`index`] - welcome page with the login link
//! - [`login`] - creates the session and redirects to the provider
//! - [`callback`] - OAuth callback; exchanges the code or surfaces the denial
//! - [`refresh`] - refresh exchange for an expired token
//! - [`logout`] - drops the session and its token
//!
//! ### Pipeline
//!
//! - [`playlists`] - the user's playlists for selection
//! - [`tracks`] - aggregates and enriches the selected playlists
//! - [`filter`] - applies criteria over the aggregate
//! - [`review`] - the currently filtered track set
//! - [`save`] - writes the filtered set back as a new playlist
//!
//! ### Monitoring
//!
//! - [`health`] - status and version for deployment checks

mod auth;
mod health;
mod pipeline;

use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::Mutex;

pub use auth::{callback, index, login, logout, refresh};
pub use health::health;
pub use pipeline::{filter, playlists, review, save, tracks};

use crate::{
    config::Config,
    error::ApiError,
    pipeline::{Aggregator, PlaylistWriter},
    session::{SessionState, SessionStore},
    spotify::{auth::AuthFlow, client::WebApi},
    utils,
};

/// Everything the handlers share: configuration, the session store, and the
/// pipeline components, all constructed once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub auth: AuthFlow,
    pub aggregator: Aggregator,
    pub writer: PlaylistWriter,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Self {
        let api = WebApi::new(config.api_base_url.clone());
        AppState {
            auth: AuthFlow::new(Arc::clone(&config)),
            aggregator: Aggregator::new(api.clone()),
            writer: PlaylistWriter::new(api),
            sessions: SessionStore::new(),
            config,
        }
    }
}

/// Resolves the signed session cookie to its stored state.
pub(crate) async fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Arc<Mutex<SessionState>>, ApiError> {
    let handle = utils::session_from_headers(headers, &state.config.session_secret)
        .ok_or(ApiError::Unauthenticated)?;
    state
        .sessions
        .get(&handle)
        .await
        .ok_or(ApiError::Unauthenticated)
}
