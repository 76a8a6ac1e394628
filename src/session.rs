use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::{
    error::ApiError,
    types::{TokenRecord, TokenRefresh, TrackRecord},
};

/// Authentication state of one session at a given instant.
///
/// `ExpiredPendingRefresh` is recoverable through the refresh exchange;
/// an expired token with no refresh token collapses to `Unauthenticated`
/// and requires a new login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated,
    ExpiredPendingRefresh,
}

/// Per-session bag: the token pair plus the transient pipeline artifacts
/// between wizard steps. Overwritten on each run through the pipeline.
/// `None` marks a step that has not run, as opposed to one that produced an
/// empty result.
#[derive(Debug, Default)]
pub struct SessionState {
    pub token: Option<TokenRecord>,
    pub aggregated: Option<Vec<TrackRecord>>,
    pub filtered: Option<Vec<TrackRecord>>,
}

impl SessionState {
    pub fn set_token(&mut self, token: TokenRecord) {
        self.token = Some(token);
    }

    /// Stores a fresh aggregate and invalidates any previous filter result.
    pub fn set_aggregate(&mut self, tracks: Vec<TrackRecord>) {
        self.aggregated = Some(tracks);
        self.filtered = None;
    }

    pub fn update_after_refresh(&mut self, refresh: &TokenRefresh, now: DateTime<Utc>) {
        if let Some(token) = &mut self.token {
            token.update_after_refresh(refresh, now);
        }
    }

    pub fn auth_state(&self, now: DateTime<Utc>) -> AuthState {
        match &self.token {
            None => AuthState::Unauthenticated,
            Some(token) if token.is_valid(now) => AuthState::Authenticated,
            Some(token) if !token.refresh_token.is_empty() => AuthState::ExpiredPendingRefresh,
            Some(_) => AuthState::Unauthenticated,
        }
    }

    /// Returns the access token for an API call, or the redirect the caller
    /// should surface instead.
    pub fn access_token(&self, now: DateTime<Utc>) -> Result<String, ApiError> {
        match self.auth_state(now) {
            AuthState::Authenticated => Ok(self
                .token
                .as_ref()
                .map(|t| t.access_token.clone())
                .unwrap_or_default()),
            AuthState::ExpiredPendingRefresh => Err(ApiError::TokenExpired),
            AuthState::Unauthenticated => Err(ApiError::Unauthenticated),
        }
    }
}

/// Session-keyed store: opaque handle to shared session state.
///
/// Each session gets its own mutex so that a refresh exchange can hold it
/// across the remote call, serializing refreshes per session without
/// blocking other sessions.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<SessionState>>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, handle: String) -> Arc<Mutex<SessionState>> {
        let session = Arc::new(Mutex::new(SessionState::default()));
        self.inner.lock().await.insert(handle, Arc::clone(&session));
        session
    }

    pub async fn get(&self, handle: &str) -> Option<Arc<Mutex<SessionState>>> {
        self.inner.lock().await.get(handle).cloned()
    }

    pub async fn remove(&self, handle: &str) {
        self.inner.lock().await.remove(handle);
    }
}
