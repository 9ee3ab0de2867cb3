use super::*;
use crate::foundation::core::{Fps, Point};
use crate::geo::geometry::{bearing, path_length};
use approx::assert_relative_eq;

fn zigzag() -> Route {
    Route::from_lng_lat(&[[0.0, 0.0], [0.01, 0.0], [0.02, 0.01], [0.03, 0.0]]).unwrap()
}

fn settings() -> AnimationSettings {
    AnimationSettings {
        follow_strength: 0.5,
        speed_km_per_s: Some(0.5),
        ..AnimationSettings::default()
    }
}

#[test]
fn follow_duration_tracks_speed() {
    let route = zigzag();
    let expected = (path_length(route.coordinates()) / 0.5 * 1000.0).clamp(4000.0, 60_000.0);
    let anim = precalculate(route, &settings()).unwrap();

    let kinds: Vec<_> = anim.spans().iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        [PhaseKind::FlyTo, PhaseKind::FollowPath, PhaseKind::FitBounds]
    );
    assert_relative_eq!(anim.spans()[1].duration_ms, expected, epsilon = 1e-6);
    assert_relative_eq!(
        anim.total_duration_ms(),
        FLY_TO_DURATION_MS + expected + FIT_BOUNDS_DURATION_MS,
        epsilon = 1e-6
    );
}

#[test]
fn keyframes_run_from_start_to_end_of_route() {
    let route = zigzag();
    let look_ahead = settings().follow_tuning().look_ahead_km;
    let expected_bearing = bearing(route.start(), route.point_at(look_ahead));
    let anim = precalculate(route, &settings()).unwrap();

    let first = anim.keyframes().first().unwrap();
    let last = anim.keyframes().last().unwrap();
    assert_eq!(first.timestamp_ms, 0.0);
    assert_eq!(first.pose.position(), Point::new(0.0, 0.0));
    assert_relative_eq!(first.pose.bearing, expected_bearing, epsilon = 1e-9);
    assert_eq!(last.timestamp_ms, anim.spans()[1].duration_ms);
    assert_eq!(last.pose.position(), Point::new(0.03, 0.0));
}

#[test]
fn keyframes_are_spaced_by_the_sampling_interval() {
    let anim = precalculate(zigzag(), &settings()).unwrap();
    let ks = anim.keyframes();
    for w in ks.windows(2) {
        let gap = w[1].timestamp_ms - w[0].timestamp_ms;
        assert!(gap > 0.0 && gap <= KEYFRAME_INTERVAL_MS + 1e-9, "gap {gap}");
    }
}

#[test]
fn progress_follows_export_cadence() {
    let s = AnimationSettings {
        fps: Fps { num: 25, den: 1 },
        ..settings()
    };
    let anim = precalculate(zigzag(), &s).unwrap();
    let ps = anim.progress();
    assert_relative_eq!(ps[1].timestamp_ms - ps[0].timestamp_ms, 40.0, epsilon = 1e-9);
    assert_eq!(ps[0].distance_km, 0.0);
    assert_eq!(ps[0].covered_vertices, 1);

    let last = ps.last().unwrap();
    assert_relative_eq!(last.distance_km, anim.route().length_km(), epsilon = 1e-9);
    assert_eq!(last.partial_route(anim.route()), anim.route().coordinates());
    for w in ps.windows(2) {
        assert!(w[1].distance_km >= w[0].distance_km);
    }
}

#[test]
fn phase_lookup_resolves_boundaries_forward() {
    let anim = precalculate(zigzag(), &settings()).unwrap();
    let follow_start = anim.spans()[1].start_ms;

    assert_eq!(anim.phase_at(0.0).kind, PhaseKind::FlyTo);
    let c = anim.phase_at(follow_start);
    assert_eq!(c.kind, PhaseKind::FollowPath);
    assert_eq!(c.local_ms, 0.0);

    let end = anim.phase_at(anim.total_duration_ms() + 1000.0);
    assert_eq!(end.index, 2);
    assert_eq!(end.local_ms, FIT_BOUNDS_DURATION_MS);
}

#[test]
fn samples_are_continuous_at_phase_joins() {
    let anim = precalculate(zigzag(), &settings()).unwrap();
    let follow = anim.spans()[1];

    let before = anim.sample_at(follow.start_ms - 1e-6).pose;
    let at = anim.sample_at(follow.start_ms).pose;
    assert_relative_eq!(before.altitude, at.altitude, epsilon = 1e-3);
    assert_relative_eq!(before.pitch, at.pitch, epsilon = 1e-3);

    let fit_start = anim.sample_at(follow.end_ms()).pose;
    assert_eq!(fit_start, anim.follow_end_pose());
}

#[test]
fn initial_and_final_poses() {
    let s = settings();
    let anim = precalculate(zigzag(), &s).unwrap();

    let initial = anim.initial_pose();
    assert_eq!(initial.position(), Point::new(0.0, 0.0));
    assert_eq!(initial.altitude, s.overview_altitude_m);

    let last = anim.final_pose();
    let center = anim.route().bounds().center();
    assert_eq!(last.position(), center);
    assert_eq!(last.altitude, s.overview_altitude_m);
}

#[test]
fn frame_count_covers_both_ends() {
    let anim = precalculate(zigzag(), &settings()).unwrap();
    let n = anim.frame_count();
    assert!(n >= 2);
    assert_eq!(anim.frame_timestamp_ms(FrameIndex(0)), 0.0);
    assert_eq!(
        anim.frame_timestamp_ms(FrameIndex(n - 1)),
        anim.total_duration_ms()
    );
}

#[test]
fn degenerate_route_holds_start() {
    let route = Route::from_lng_lat(&[[5.0, 5.0], [5.0, 5.0]]).unwrap();
    let anim = precalculate(route, &settings()).unwrap();
    assert_eq!(anim.keyframes().len(), 1);
    let mid = anim.sample_at(anim.spans()[1].start_ms + 1000.0);
    assert_eq!(mid.pose.position(), Point::new(5.0, 5.0));
    assert!(mid.pose.is_finite());
}

#[test]
fn rejects_invalid_settings() {
    let s = AnimationSettings {
        follow_strength: -0.1,
        ..AnimationSettings::default()
    };
    assert!(precalculate(zigzag(), &s).is_err());
}

#[test]
fn bind_matches_precalculate() {
    let a = bind(zigzag(), &settings()).unwrap();
    let b = precalculate(zigzag(), &settings()).unwrap();
    assert_eq!(a.keyframes(), b.keyframes());
    assert_eq!(a.progress(), b.progress());
}

#[test]
fn overview_bearing_is_wrapped_before_reaching_the_surface() {
    for (raw, wrapped) in [(370.0, 10.0), (-10.0, 350.0)] {
        let s = AnimationSettings {
            overview_bearing: raw,
            ..settings()
        };
        let anim = precalculate(zigzag(), &s).unwrap();
        match &anim.sequence().phases()[2] {
            AnimationPhase::FitBounds { params, .. } => {
                assert_relative_eq!(params.bearing, wrapped, epsilon = 1e-9)
            }
            other => panic!("unexpected phase {other:?}"),
        }
        match &anim.sequence().phases()[0] {
            AnimationPhase::FlyTo { params, .. } => {
                assert_relative_eq!(params.from.bearing, wrapped, epsilon = 1e-9)
            }
            other => panic!("unexpected phase {other:?}"),
        }
        assert_relative_eq!(anim.final_pose().bearing, wrapped, epsilon = 1e-9);
        assert_relative_eq!(anim.initial_pose().bearing, wrapped, epsilon = 1e-9);
    }
}

#[test]
fn phase_eases_come_from_settings() {
    let s = AnimationSettings {
        fly_to_ease: crate::animation::ease::Ease::Linear,
        ..settings()
    };
    let anim = precalculate(zigzag(), &s).unwrap();
    let start = anim.initial_pose().altitude;
    let end = anim.keyframes()[0].pose.altitude;
    let mid = anim.sample_at(FLY_TO_DURATION_MS / 2.0).pose.altitude;
    assert_relative_eq!(mid, (start + end) / 2.0, epsilon = 1e-6);

    let eased = precalculate(zigzag(), &settings()).unwrap();
    assert!(eased.sample_at(FLY_TO_DURATION_MS / 2.0).pose.altitude < mid);
}
