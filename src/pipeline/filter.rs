use crate::types::{FilterCriteria, TrackRecord};

/// Applies the criteria over the aggregate. Pure and stable: passing tracks
/// keep their relative order, so the output is a subsequence of the input.
pub fn apply(tracks: &[TrackRecord], criteria: &FilterCriteria) -> Vec<TrackRecord> {
    tracks
        .iter()
        .filter(|track| passes(track, criteria))
        .cloned()
        .collect()
}

fn passes(track: &TrackRecord, criteria: &FilterCriteria) -> bool {
    in_range(
        track.danceability,
        criteria.min_danceability,
        criteria.max_danceability,
        0.0,
        1.0,
    ) && in_range(
        track.energy,
        criteria.min_energy,
        criteria.max_energy,
        0.0,
        1.0,
    ) && in_range(
        track.tempo,
        criteria.min_tempo,
        criteria.max_tempo,
        0.0,
        f64::INFINITY,
    ) && match criteria.key {
        None => true,
        Some(expected) => track.key == Some(expected),
    }
}

/// Closed-interval test with defaults for the unsupplied end.
///
/// A bound nobody supplied is the identity and passes everything, including
/// tracks with the attribute absent. Once either end is supplied, an absent
/// attribute fails the bound, even when the supplied interval happens to
/// look maximal.
fn in_range(
    value: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
    default_min: f64,
    default_max: f64,
) -> bool {
    if min.is_none() && max.is_none() {
        return true;
    }

    match value {
        None => false,
        Some(v) => v >= min.unwrap_or(default_min) && v <= max.unwrap_or(default_max),
    }
}
