use super::*;

#[test]
fn rejects_short_and_non_finite_routes() {
    assert!(matches!(
        Route::from_lng_lat(&[[0.0, 0.0]]),
        Err(RouteCamError::InvalidInput(_))
    ));
    assert!(matches!(
        Route::from_lng_lat(&[[0.0, 0.0], [f64::NAN, 1.0]]),
        Err(RouteCamError::InvalidInput(_))
    ));
    assert!(matches!(
        Route::from_lng_lat(&[[0.0, 0.0], [1.0, 91.0]]),
        Err(RouteCamError::InvalidInput(_))
    ));
}

#[test]
fn identical_points_are_degenerate_but_valid() {
    let r = Route::from_lng_lat(&[[3.0, 4.0], [3.0, 4.0]]).unwrap();
    assert!(r.is_degenerate());
    assert_eq!(r.point_at(10.0), Point::new(3.0, 4.0));
    assert_eq!(r.initial_bearing(), 0.0);
}

#[test]
fn derived_values() {
    let r = Route::from_lng_lat(&[[0.0, 0.0], [0.0, 0.0], [1.0, 0.0]]).unwrap();
    assert!(!r.is_degenerate());
    assert!((r.initial_bearing() - 90.0).abs() < 1e-9);
    assert_eq!(r.start(), Point::new(0.0, 0.0));
    assert_eq!(r.end(), Point::new(1.0, 0.0));
    assert_eq!(r.cumulative_km().len(), 3);
    assert_eq!(r.bounds().x1, 1.0);
}

#[test]
fn parses_geojson_linestring_with_elevation() {
    let json = r#"{"type":"LineString","coordinates":[[8.5,47.3,410.0],[8.6,47.4,420.0]]}"#;
    let r: Route = serde_json::from_str(json).unwrap();
    assert_eq!(r.coordinates().len(), 2);
    assert_eq!(r.end(), Point::new(8.6, 47.4));
}

#[test]
fn serde_validation_errors_surface() {
    let json = r#"{"coordinates":[[8.5,47.3]]}"#;
    let err = serde_json::from_str::<Route>(json).unwrap_err();
    assert!(err.to_string().contains("at least 2 points"));

    let json = r#"{"coordinates":[[8.5],[1.0,2.0]]}"#;
    assert!(serde_json::from_str::<Route>(json).is_err());
}

#[test]
fn serializes_as_coordinate_pairs() {
    let r = Route::from_lng_lat(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    let v = serde_json::to_value(&r).unwrap();
    assert_eq!(v["coordinates"][1], serde_json::json!([3.0, 4.0]));
}
