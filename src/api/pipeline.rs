use axum::{
    Form, Json,
    extract::State,
    http::HeaderMap,
    response::Redirect,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    api::{AppState, resolve_session},
    error::ApiError,
    info,
    pipeline::filter::apply,
    success,
    types::{FilterCriteria, PlaylistResult, PlaylistSummary, TrackRecord},
};

#[derive(Debug, Deserialize)]
pub struct SelectPlaylistsRequest {
    pub playlist_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SavePlaylistRequest {
    pub name: String,
}

/// Playlist summaries for the selection step.
pub async fn playlists(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PlaylistSummary>>, ApiError> {
    let session = resolve_session(&state, &headers).await?;
    let token = session.lock().await.access_token(Utc::now())?;

    let playlists = state.aggregator.list_playlists(&token).await?;
    Ok(Json(playlists))
}

/// Aggregates the selected playlists and enriches the result with audio
/// features. The enriched set replaces whatever an earlier run left in the
/// session, and any previous filter result with it.
pub async fn tracks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<SelectPlaylistsRequest>,
) -> Result<Json<Vec<TrackRecord>>, ApiError> {
    let session = resolve_session(&state, &headers).await?;
    let token = session.lock().await.access_token(Utc::now())?;

    let collected = state
        .aggregator
        .collect_tracks(&token, &request.playlist_ids)
        .await?;
    info!(
        "Collected {} tracks from {} playlists",
        collected.len(),
        request.playlist_ids.len()
    );

    let enriched = state
        .aggregator
        .enrich_with_audio_features(&token, collected)
        .await;

    session.lock().await.set_aggregate(enriched.clone());
    Ok(Json(enriched))
}

/// Applies the submitted criteria over the session's aggregate and stores
/// the result for review. Pure in-memory step; no provider calls.
pub async fn filter(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(criteria): Form<FilterCriteria>,
) -> Result<Redirect, ApiError> {
    let session = resolve_session(&state, &headers).await?;
    let mut guard = session.lock().await;

    let filtered = match &guard.aggregated {
        Some(aggregated) => apply(aggregated, &criteria),
        None => {
            return Err(ApiError::MissingPipelineState(
                "no aggregated tracks in session; submit a playlist selection first",
            ));
        }
    };

    guard.filtered = Some(filtered);
    Ok(Redirect::to("/review"))
}

/// The currently filtered track set.
pub async fn review(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<TrackRecord>>, ApiError> {
    let session = resolve_session(&state, &headers).await?;
    let guard = session.lock().await;

    guard
        .filtered
        .clone()
        .map(Json)
        .ok_or(ApiError::MissingPipelineState(
            "no filtered tracks in session; apply a filter first",
        ))
}

/// Writes the filtered set back as a new playlist and reports its name and
/// public URL. Write failures carry the stage that failed.
pub async fn save(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(request): Form<SavePlaylistRequest>,
) -> Result<Json<PlaylistResult>, ApiError> {
    let session = resolve_session(&state, &headers).await?;

    let (token, track_ids) = {
        let guard = session.lock().await;
        let token = guard.access_token(Utc::now())?;
        let Some(filtered) = &guard.filtered else {
            return Err(ApiError::MissingPipelineState(
                "no filtered tracks in session; apply a filter first",
            ));
        };
        let track_ids: Vec<String> = filtered.iter().map(|t| t.track_id.clone()).collect();
        (token, track_ids)
    };

    let result = state
        .writer
        .create_and_populate(&token, &request.name, &track_ids)
        .await?;

    success!(
        "Created playlist '{}' with {} tracks",
        result.name,
        track_ids.len()
    );
    Ok(Json(result))
}
