use reqwest::StatusCode;

use crate::{
    error::WriteError,
    spotify::client::WebApi,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, CurrentUserResponse,
        PlaylistResult,
    },
};

const PLAYLIST_DESCRIPTION: &str = "Filtered by audio features with mixsift.";

/// Writes the filtered track set back to the provider as a new playlist.
#[derive(Clone)]
pub struct PlaylistWriter {
    api: WebApi,
}

impl PlaylistWriter {
    pub fn new(api: WebApi) -> Self {
        PlaylistWriter { api }
    }

    /// Resolves the current user, creates the playlist, then adds all track
    /// URIs in one batch call in the given order.
    ///
    /// The two stages fail distinctly: `CreateFailed` means no playlist
    /// exists (creation must return 201), `AddTracksFailed` means it exists
    /// but is missing its tracks. User resolution is part of the create
    /// stage. No add call is attempted after a failed create.
    pub async fn create_and_populate(
        &self,
        token: &str,
        name: &str,
        track_ids: &[String],
    ) -> Result<PlaylistResult, WriteError> {
        let user: CurrentUserResponse = self
            .api
            .get_json("/me", token)
            .await
            .map_err(|e| WriteError::CreateFailed(e.to_string()))?;

        let request = CreatePlaylistRequest {
            name: name.to_string(),
            description: PLAYLIST_DESCRIPTION.to_string(),
            public: false,
        };
        let response = self
            .api
            .post_json(&format!("/users/{}/playlists", user.id), token, &request)
            .await
            .map_err(|e| WriteError::CreateFailed(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(WriteError::CreateFailed(format!("status {status}")));
        }

        let created: CreatePlaylistResponse = response
            .json()
            .await
            .map_err(|e| WriteError::CreateFailed(e.to_string()))?;

        let uris = track_ids
            .iter()
            .map(|id| format!("spotify:track:{id}"))
            .collect();
        let response = self
            .api
            .post_json(
                &format!("/playlists/{}/tracks", created.id),
                token,
                &AddTracksRequest { uris },
            )
            .await
            .map_err(|e| WriteError::AddTracksFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WriteError::AddTracksFailed(format!("status {status}")));
        }

        let url = created
            .external_urls
            .and_then(|urls| urls.spotify)
            .unwrap_or_else(|| format!("https://open.spotify.com/playlist/{}", created.id));

        Ok(PlaylistResult {
            name: created.name,
            url,
        })
    }
}
