use std::sync::Arc;

use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    error::RemoteCallError,
    spotify::client::WebApi,
    types::{
        AudioFeatures, GetUserPlaylistsResponse, PlaylistItem, PlaylistItemsResponse,
        PlaylistSummary, TrackRecord,
    },
    warning,
};

/// Upper bound on outstanding audio-feature lookups, kept well inside the
/// provider's rate limits.
pub const ENRICH_CONCURRENCY: usize = 12;

/// Fetches and merges the remote resources that make up the track aggregate.
///
/// Collection is sequential and ordered; enrichment fans out per track on a
/// bounded pool. The output order of every operation is the input order,
/// never completion order.
#[derive(Clone)]
pub struct Aggregator {
    api: WebApi,
}

impl Aggregator {
    pub fn new(api: WebApi) -> Self {
        Aggregator { api }
    }

    /// Lists the user's playlists for the selection step.
    ///
    /// Only the first page (50 entries) is requested. The original service
    /// behaved the same way; paginating further is an open scope question,
    /// so the limitation is kept rather than silently widened.
    pub async fn list_playlists(&self, token: &str) -> Result<Vec<PlaylistSummary>, RemoteCallError> {
        let page: GetUserPlaylistsResponse = self.api.get_json("/me/playlists?limit=50", token).await?;

        Ok(page
            .items
            .into_iter()
            .map(|playlist| PlaylistSummary {
                id: playlist.id,
                name: playlist.name,
                track_count: playlist.tracks.total,
            })
            .collect())
    }

    /// Fetches the contents of each selected playlist, in the given order,
    /// and flattens them into source track records.
    ///
    /// The output is playlist order, then item order within each playlist.
    /// A track appearing in several selected playlists appears once per
    /// occurrence; multiplicity is preserved on purpose. Any fetch failure
    /// aborts the whole collection, since a partial aggregate would silently
    /// misrepresent the selection.
    pub async fn collect_tracks(
        &self,
        token: &str,
        playlist_ids: &[String],
    ) -> Result<Vec<TrackRecord>, RemoteCallError> {
        let mut tracks = Vec::new();
        for playlist_id in playlist_ids {
            let page: PlaylistItemsResponse = self
                .api
                .get_json(&format!("/playlists/{playlist_id}/tracks"), token)
                .await?;
            tracks.extend(source_tracks(page.items));
        }
        Ok(tracks)
    }

    /// Merges audio features into the aggregate, one lookup per track.
    ///
    /// Lookups run concurrently, bounded by [`ENRICH_CONCURRENCY`]; results
    /// are written back by index so the output order matches the input
    /// regardless of completion order. Enrichment is best-effort: a failed
    /// or malformed lookup leaves that track's attributes absent and the
    /// batch continues. Dropping the returned future aborts all outstanding
    /// lookups.
    pub async fn enrich_with_audio_features(
        &self,
        token: &str,
        mut tracks: Vec<TrackRecord>,
    ) -> Vec<TrackRecord> {
        let semaphore = Arc::new(Semaphore::new(ENRICH_CONCURRENCY));
        let mut lookups: JoinSet<(usize, Option<AudioFeatures>)> = JoinSet::new();

        for (index, track) in tracks.iter().enumerate() {
            let api = self.api.clone();
            let token = token.to_string();
            let track_id = track.track_id.clone();
            let semaphore = Arc::clone(&semaphore);

            lookups.spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return (index, None),
                };

                match api
                    .get_json::<AudioFeatures>(&format!("/audio-features/{track_id}"), &token)
                    .await
                {
                    Ok(features) => (index, Some(features)),
                    Err(e) => {
                        warning!("Audio feature lookup failed for {}: {}", track_id, e);
                        (index, None)
                    }
                }
            });
        }

        let mut features: Vec<Option<AudioFeatures>> = vec![None; tracks.len()];
        while let Some(joined) = lookups.join_next().await {
            if let Ok((index, looked_up)) = joined {
                features[index] = looked_up;
            }
        }

        for (track, looked_up) in tracks.iter_mut().zip(features) {
            if let Some(looked_up) = looked_up {
                track.merge_features(looked_up);
            }
        }

        tracks
    }
}

/// Flattens one page of playlist items into source track records, keeping
/// item order. Entries without a track object or without an id (removed or
/// local tracks) are skipped.
pub fn source_tracks(items: Vec<PlaylistItem>) -> Vec<TrackRecord> {
    items
        .into_iter()
        .filter_map(|item| item.track)
        .filter_map(|track| {
            let id = track.id?;
            Some(TrackRecord::new(
                id,
                track.name,
                track.artists.into_iter().map(|artist| artist.name).collect(),
            ))
        })
        .collect()
}
