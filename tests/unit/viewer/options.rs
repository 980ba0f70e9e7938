use super::*;

#[test]
fn defaults_match_documented_values() {
    let o = ViewerOptions::default();
    assert_eq!(o.track_corner, TrackCorner::BottomRight);
    assert!(o.show_index && o.show_progress_bar && o.tilt_control);
    assert_eq!(o.progress_bar_position, BarPosition::Bottom);
    assert_eq!(o.rotation_degrees, 0.0);
    assert!(!o.flip_horizontal);
    assert_eq!(o.edge_threshold_px, 50.0);
    assert_eq!(o.tilt_threshold_deg, 10.0);
}

#[test]
fn partial_json_fills_defaults() {
    let o = ViewerOptions::from_json_str(
        r#"{"track_corner":"tl","progress_bar_position":"top","rotation_degrees":90}"#,
    )
    .unwrap();
    assert_eq!(o.track_corner, TrackCorner::TopLeft);
    assert_eq!(o.progress_bar_position, BarPosition::Top);
    assert_eq!(o.rotation_degrees, 90.0);
    assert!(o.show_index);
    assert_eq!(ViewerOptions::from_json_str("{}").unwrap(), ViewerOptions::default());
}

#[test]
fn unknown_corner_falls_back() {
    let o = ViewerOptions::from_json_str(r#"{"track_corner":"middle"}"#).unwrap();
    assert_eq!(o.track_corner, TrackCorner::BottomRight);
}

#[test]
fn bad_json_is_validation_error() {
    let err = ViewerOptions::from_json_str(r#"{"show_index":"yes"}"#).unwrap_err();
    assert!(matches!(err, WdpError::Validation(_)));
    let err = ViewerOptions::from_json_str(r#"{"edge_threshold_px":-1}"#).unwrap_err();
    assert!(matches!(err, WdpError::Validation(_)));
}

#[test]
fn json_roundtrip_keeps_codes() {
    let o = ViewerOptions {
        track_corner: TrackCorner::MiddleRight,
        ..ViewerOptions::default()
    };
    let json = serde_json::to_string(&o).unwrap();
    assert!(json.contains(r#""track_corner":"mr""#));
    assert!(json.contains(r#""progress_bar_position":"bottom""#));
    assert_eq!(ViewerOptions::from_json_str(&json).unwrap(), o);
}

#[test]
fn missing_file_is_other_error() {
    let err = ViewerOptions::from_json_file(Path::new("/nonexistent/wdp/options.json"))
        .unwrap_err();
    assert!(matches!(err, WdpError::Other(_)));
}

#[test]
fn derived_views_copy_fields() {
    let o = ViewerOptions {
        edge_threshold_px: 5.0,
        show_index: false,
        ..ViewerOptions::default()
    };
    assert_eq!(o.mapper().edge_threshold_px, 5.0);
    assert!(!o.overlay().show_index);
}
