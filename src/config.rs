//! Configuration management for the playlist filtering service.
//!
//! This module handles loading configuration from environment variables and
//! `.env` files and materializing it into a [`Config`] struct that is built
//! once at startup and passed by reference into the components that need it.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. `.env` file in the working directory
//! 4. Application defaults (where applicable)

use std::{env, path::PathBuf, sync::Arc};

use reqwest::Url;

/// Default OAuth scope requested during authorization.
///
/// Covers reading the user's profile and playlists plus creating and
/// modifying playlists on their behalf.
pub const DEFAULT_SCOPE: &str =
    "user-read-private user-read-email playlist-modify-public playlist-modify-private";

const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";

/// Runtime configuration, resolved once at startup.
///
/// The four credential fields are required; their absence is startup-fatal
/// (see [`Config::from_env`]). The endpoint URLs default to the public
/// Spotify endpoints and exist as overrides so tests can point the service
/// at a mock provider.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Secret used to sign session cookie values.
    pub session_secret: String,
    /// OAuth scopes, space-joined into the authorize URL.
    pub scopes: Vec<String>,
    pub server_address: String,
    /// Authorization endpoint, parsed up front so query building is infallible.
    pub auth_url: Url,
    pub token_url: String,
    pub api_base_url: String,
}

impl Config {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first missing required variable:
    /// `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`, `SPOTIFY_REDIRECT_URI`
    /// or `SESSION_SECRET`. The caller treats this as fatal.
    pub fn from_env() -> Result<Self, String> {
        let scopes = env::var("SPOTIFY_SCOPE")
            .unwrap_or_else(|_| DEFAULT_SCOPE.to_string())
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let auth_url = env::var("SPOTIFY_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string());
        let auth_url =
            Url::parse(&auth_url).map_err(|e| format!("SPOTIFY_AUTH_URL is not a URL: {e}"))?;

        Ok(Config {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            session_secret: required("SESSION_SECRET")?,
            scopes,
            server_address: env::var("SERVER_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_SERVER_ADDRESS.to_string()),
            auth_url,
            token_url: env::var("SPOTIFY_TOKEN_URL")
                .unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string()),
            api_base_url: env::var("SPOTIFY_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        })
    }

    /// Space-joined scope string as it appears in the authorize URL.
    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

fn required(name: &str) -> Result<String, String> {
    env::var(name).map_err(|_| format!("{name} must be set"))
}

/// Loads environment variables from a `.env` file if one is present.
///
/// Looks in the platform-specific local data directory first
/// (`mixsift/.env`), then in the working directory. A missing file is not an
/// error; deployments may provide plain environment variables instead.
///
/// # Directory Structure
///
/// The data-directory location is:
/// - Linux: `~/.local/share/mixsift/.env`
/// - macOS: `~/Library/Application Support/mixsift/.env`
/// - Windows: `%LOCALAPPDATA%/mixsift/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("mixsift/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    } else {
        // Fall back to a .env next to the binary's working directory.
        dotenv::dotenv().ok();
    }
    Ok(())
}
