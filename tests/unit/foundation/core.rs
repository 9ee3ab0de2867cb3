use super::*;

#[test]
fn frame_range_counts_exclusive_end() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert_eq!(r.len_frames(), 3);
    assert!(!r.is_empty());
    assert!(FrameRange::new(FrameIndex(3), FrameIndex(2)).is_err());
}

#[test]
fn frame_range_intersect_clips_and_collapses() {
    let a = FrameRange::new(FrameIndex(0), FrameIndex(10)).unwrap();
    let b = FrameRange::new(FrameIndex(4), FrameIndex(20)).unwrap();
    assert_eq!(a.intersect(b).start, FrameIndex(4));
    assert_eq!(a.intersect(b).end, FrameIndex(10));

    let far = FrameRange::new(FrameIndex(30), FrameIndex(40)).unwrap();
    assert!(a.intersect(far).is_empty());
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn frame_timestamps_come_from_the_index() {
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.frame_timestamp_ms(FrameIndex(0)), 0.0);
    assert_eq!(fps.frame_timestamp_ms(FrameIndex(3)), 100.0);
    assert_eq!(fps.frame_timestamp_ms(FrameIndex(30)), 1000.0);
}

#[test]
fn frames_for_duration_includes_both_ends() {
    let fps = Fps::new(20, 1).unwrap();
    // 50 ms interval: 0, 50, ..., 1000
    assert_eq!(fps.frames_for_duration_ms(1000.0), 21);
    assert_eq!(fps.frames_for_duration_ms(0.0), 1);
    assert_eq!(fps.frames_for_duration_ms(1010.0), 22);
}

#[test]
fn pose_constructor_normalizes_bearing() {
    let p = CameraPose::new(Point::new(1.0, 2.0), 100.0, -90.0, 30.0);
    assert_eq!(p.bearing, 270.0);
    assert_eq!(p.position(), Point::new(1.0, 2.0));
}

#[test]
fn non_finite_pose_is_a_calculation_error() {
    let mut p = CameraPose::new(Point::new(1.0, 2.0), 100.0, 0.0, 30.0);
    assert!(p.ensure_finite().is_ok());
    p.latitude = f64::NAN;
    assert!(matches!(
        p.ensure_finite(),
        Err(RouteCamError::Calculation(_))
    ));
}

#[test]
fn duration_ms_conversion_is_exact_for_whole_millis() {
    let d = std::time::Duration::from_millis(50);
    assert_eq!(duration_to_ms(d), 50.0);
    assert_eq!(ms_to_duration(50.0), d);
    assert_eq!(ms_to_duration(-3.0), std::time::Duration::ZERO);
}
