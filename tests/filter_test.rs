use mixsift::pipeline::filter::apply;
use mixsift::types::{FilterCriteria, TrackRecord};

// Helper function to create an enriched test track
fn track(
    id: &str,
    danceability: Option<f64>,
    energy: Option<f64>,
    tempo: Option<f64>,
    key: Option<i32>,
) -> TrackRecord {
    TrackRecord {
        track_id: id.to_string(),
        track_name: format!("Track {id}"),
        artist_names: vec!["Artist".to_string()],
        danceability,
        energy,
        key,
        mode: Some(1),
        tempo,
    }
}

fn ids(tracks: &[TrackRecord]) -> Vec<&str> {
    tracks.iter().map(|t| t.track_id.as_str()).collect()
}

#[test]
fn test_default_criteria_is_identity() {
    let tracks = vec![
        track("t1", Some(0.5), Some(0.8), Some(120.0), Some(5)),
        track("t2", None, None, None, None), // unanalyzed track stays too
        track("t3", Some(0.0), Some(0.0), Some(60.0), Some(-1)),
    ];

    let filtered = apply(&tracks, &FilterCriteria::default());
    assert_eq!(ids(&filtered), ids(&tracks));
}

#[test]
fn test_apply_is_idempotent() {
    let tracks = vec![
        track("t1", Some(0.9), None, Some(130.0), None),
        track("t2", Some(0.2), None, Some(90.0), None),
        track("t3", None, None, None, None),
    ];
    let criteria = FilterCriteria {
        min_danceability: Some(0.5),
        ..FilterCriteria::default()
    };

    let once = apply(&tracks, &criteria);
    let twice = apply(&once, &criteria);
    assert_eq!(ids(&once), ids(&twice));
}

#[test]
fn test_absent_attribute_fails_supplied_bound() {
    let tracks = vec![
        track("analyzed", Some(0.7), None, None, None),
        track("unanalyzed", None, None, None, None),
    ];

    // A maximal-looking interval is still a supplied bound; absent values
    // must not slip through as if they were in range.
    let criteria = FilterCriteria {
        min_danceability: Some(0.0),
        max_danceability: Some(1.0),
        ..FilterCriteria::default()
    };

    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["analyzed"]);
}

#[test]
fn test_half_open_bound_is_active() {
    let tracks = vec![
        track("t1", None, Some(0.4), None, None),
        track("t2", None, None, None, None),
    ];
    let criteria = FilterCriteria {
        max_energy: Some(0.5),
        ..FilterCriteria::default()
    };

    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["t1"]);
}

#[test]
fn test_tempo_range() {
    // Scenario: [120,140] over {130, 150, absent} keeps only the first
    let tracks = vec![
        track("t1", None, None, Some(130.0), None),
        track("t2", None, None, Some(150.0), None),
        track("t3", None, None, None, None),
    ];
    let criteria = FilterCriteria {
        min_tempo: Some(120.0),
        max_tempo: Some(140.0),
        ..FilterCriteria::default()
    };

    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["t1"]);
}

#[test]
fn test_range_bounds_are_closed() {
    let tracks = vec![
        track("low", None, None, Some(120.0), None),
        track("high", None, None, Some(140.0), None),
        track("outside", None, None, Some(140.1), None),
    ];
    let criteria = FilterCriteria {
        min_tempo: Some(120.0),
        max_tempo: Some(140.0),
        ..FilterCriteria::default()
    };

    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["low", "high"]);
}

#[test]
fn test_key_exact_match() {
    let tracks = vec![
        track("t1", None, None, None, Some(5)),
        track("t2", None, None, None, Some(7)),
        track("t3", None, None, None, None), // no analysis, no match
    ];
    let criteria = FilterCriteria {
        key: Some(5),
        ..FilterCriteria::default()
    };

    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["t1"]);
}

#[test]
fn test_filter_is_stable() {
    let tracks = vec![
        track("t1", Some(0.9), None, None, None),
        track("t2", Some(0.1), None, None, None),
        track("t3", Some(0.8), None, None, None),
        track("t4", Some(0.2), None, None, None),
        track("t5", Some(0.7), None, None, None),
    ];
    let criteria = FilterCriteria {
        min_danceability: Some(0.5),
        ..FilterCriteria::default()
    };

    // Output is a subsequence of the input in original order
    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["t1", "t3", "t5"]);
}

#[test]
fn test_combined_criteria_all_must_hold() {
    let tracks = vec![
        track("t1", Some(0.8), Some(0.6), Some(125.0), Some(2)),
        track("t2", Some(0.8), Some(0.6), Some(125.0), Some(3)),
        track("t3", Some(0.8), None, Some(125.0), Some(2)),
    ];
    let criteria = FilterCriteria {
        min_danceability: Some(0.5),
        max_danceability: None,
        min_energy: Some(0.5),
        max_energy: Some(0.9),
        min_tempo: Some(120.0),
        max_tempo: Some(130.0),
        key: Some(2),
    };

    let filtered = apply(&tracks, &criteria);
    assert_eq!(ids(&filtered), vec!["t1"]);
}
