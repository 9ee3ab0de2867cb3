use super::*;
use proptest::prelude::*;

fn straight(length_deg: f64) -> Route {
    Route::from_lng_lat(&[[0.0, 0.0], [length_deg, 0.0]]).unwrap()
}

#[test]
fn fixed_phase_durations() {
    assert_eq!(fly_to_duration(), 2000.0);
    assert_eq!(fit_bounds_duration(), 2000.0);
}

#[test]
fn calibration_points_are_hit_exactly() {
    assert_eq!(base_follow_path_duration(10.0), 4000.0);
    assert_eq!(base_follow_path_duration(25.0), 10000.0);
    assert_eq!(base_follow_path_duration(130.0), 60000.0);
}

#[test]
fn logarithmic_between_calibration_points() {
    // the log curve sits above the straight chord between two calibration points
    let mid = base_follow_path_duration(17.5);
    assert!(mid > 7000.0 && mid < 10000.0, "got {mid}");
}

#[test]
fn extrapolates_linearly_outside_calibration() {
    assert_eq!(base_follow_path_duration(5.0), 2000.0);
    assert!(base_follow_path_duration(200.0) > 60000.0);
    assert_eq!(base_follow_path_duration(0.0), 0.0);
}

#[test]
fn straight_route_has_no_complexity() {
    assert_eq!(route_complexity(&straight(0.5)), 0.0);
}

#[test]
fn zigzag_route_scores_complexity() {
    let pts: Vec<[f64; 2]> = (0..33)
        .map(|i| [f64::from(i) * 0.01, if i % 2 == 0 { 0.0 } else { 0.01 }])
        .collect();
    let zig = Route::from_lng_lat(&pts).unwrap();
    let c = route_complexity(&zig);
    assert!(c > 0.0 && c <= 1.0, "got {c}");
}

#[test]
fn complexity_extends_duration() {
    let pts: Vec<[f64; 2]> = (0..33)
        .map(|i| [f64::from(i) * 0.05, if i % 2 == 0 { 0.0 } else { 0.05 }])
        .collect();
    let zig = Route::from_lng_lat(&pts).unwrap();
    let base = base_follow_path_duration(zig.length_km()).clamp(MIN_FOLLOW_PATH_MS, MAX_FOLLOW_PATH_MS);
    assert!(follow_path_duration(&zig) >= base);
}

#[test]
fn speed_based_duration() {
    let r = straight(0.5); // ~55.6 km
    let ms = follow_path_duration_for_speed(&r, 2.0);
    assert!((ms - r.length_km() / 2.0 * 1000.0).abs() < 1e-6);
    assert_eq!(follow_path_duration_for_speed(&r, 0.0001), MAX_FOLLOW_PATH_MS);
    assert_eq!(follow_path_duration_for_speed(&straight(0.001), 50.0), MIN_FOLLOW_PATH_MS);
}

proptest! {
    #[test]
    fn follow_path_is_monotonic_in_length(a in 0.001..3.0f64, b in 0.001..3.0f64) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(follow_path_duration(&straight(short)) <= follow_path_duration(&straight(long)));
    }

    #[test]
    fn durations_stay_in_bounds(
        pts in prop::collection::vec((-2.0..2.0f64, -2.0..2.0f64), 2..12)
    ) {
        let pairs: Vec<[f64; 2]> = pts.into_iter().map(|(x, y)| [x, y]).collect();
        let route = Route::from_lng_lat(&pairs).unwrap();
        let follow = follow_path_duration(&route);
        prop_assert!((4000.0..=60000.0).contains(&follow));
        let total = total_duration(&route);
        prop_assert!((8000.0..=64000.0).contains(&total));
    }
}
