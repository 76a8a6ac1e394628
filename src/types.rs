use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::empty_string_as_none;

/// Access/refresh token pair with an absolute expiry instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(
        access_token: String,
        refresh_token: String,
        expires_in: i64,
        now: DateTime<Utc>,
    ) -> Self {
        TokenRecord {
            access_token,
            refresh_token,
            expires_at: now + Duration::seconds(expires_in),
        }
    }

    /// True strictly before `expires_at`; false at the boundary and after.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Applies a refresh exchange result. The refresh token is left untouched
    /// unless the provider reissued one.
    pub fn update_after_refresh(&mut self, refresh: &TokenRefresh, now: DateTime<Utc>) {
        self.access_token = refresh.access_token.clone();
        self.expires_at = now + Duration::seconds(refresh.expires_in);
        if let Some(reissued) = &refresh.refresh_token {
            self.refresh_token = reissued.clone();
        }
    }
}

/// Wire shape of a successful code exchange. All fields required; a response
/// missing any of them fails deserialization and the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

/// Wire shape of a refresh exchange. The provider may or may not rotate the
/// refresh token.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenRefresh {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
}

/// One track of the aggregate, with audio attributes merged in where the
/// provider has an analysis. `None` means absent, which filters treat
/// differently from zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackRecord {
    pub track_id: String,
    pub track_name: String,
    pub artist_names: Vec<String>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i32>,
    pub mode: Option<i32>,
    pub tempo: Option<f64>,
}

impl TrackRecord {
    pub fn new(track_id: String, track_name: String, artist_names: Vec<String>) -> Self {
        TrackRecord {
            track_id,
            track_name,
            artist_names,
            danceability: None,
            energy: None,
            key: None,
            mode: None,
            tempo: None,
        }
    }

    pub fn merge_features(&mut self, features: AudioFeatures) {
        self.danceability = features.danceability;
        self.energy = features.energy;
        self.key = features.key;
        self.mode = features.mode;
        self.tempo = features.tempo;
    }
}

/// Range/exact-match criteria over the enriched aggregate, deserialized from
/// the filter form. Empty form fields deserialize to `None`; a bound counts
/// as supplied as soon as one of its ends is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterCriteria {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_danceability: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_danceability: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_energy: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_energy: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub min_tempo: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub max_tempo: Option<f64>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub key: Option<i32>,
}

/// One entry of the playlist selection step.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub track_count: u32,
}

/// Name and public URL of the playlist created by the save step.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistResult {
    pub name: String,
    pub url: String,
}

// --- Provider wire shapes ---

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserPlaylistsResponse {
    pub items: Vec<PlaylistEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    pub id: String,
    pub name: String,
    pub tracks: PlaylistTracksRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemsResponse {
    pub items: Vec<PlaylistItem>,
}

/// Item of a playlist contents page. `track` is null for removed or local
/// entries, and local tracks carry a null id; both are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub track: Option<PlaylistItemTrack>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemTrack {
    pub id: Option<String>,
    pub name: String,
    pub artists: Vec<TrackArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

/// Audio analysis attributes for one track. Individually optional so a
/// partial analysis merges partially instead of failing the lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioFeatures {
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<i32>,
    pub mode: Option<i32>,
    pub tempo: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentUserResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}
