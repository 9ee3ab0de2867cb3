use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new(0);
    a.write_bytes(b"routecam");
    let mut b = Fnv1a64::new(0);
    b.write_u8(b'r');
    b.write_bytes(b"outecam");
    assert_eq!(a.finish(), b.finish());

    let mut c = Fnv1a64::new(7);
    c.write_bytes(b"routecam");
    assert_ne!(a.finish(), c.finish());
}

#[test]
fn fnv_f64_hashes_bit_patterns() {
    let mut a = Fnv1a64::new(0);
    a.write_f64(0.0);
    let mut b = Fnv1a64::new(0);
    b.write_f64(-0.0);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn normalize_bearing_wraps_into_range() {
    assert_eq!(normalize_bearing(360.0), 0.0);
    assert_eq!(normalize_bearing(-10.0), 350.0);
    assert_eq!(normalize_bearing(725.0), 5.0);
    assert_eq!(normalize_bearing(-1e-17), 0.0);
}

#[test]
fn shortest_delta_picks_the_short_arc() {
    assert_eq!(shortest_bearing_delta(350.0, 10.0), 20.0);
    assert_eq!(shortest_bearing_delta(10.0, 350.0), -20.0);
    assert_eq!(shortest_bearing_delta(0.0, 180.0), 180.0);
    assert_eq!(shortest_bearing_delta(90.0, 90.0), 0.0);
}

#[test]
fn lerp_bearing_crosses_north_not_south() {
    let mid = lerp_bearing(350.0, 10.0, 0.5);
    assert!(mid < 1e-9 || mid > 359.999_999);
    let quarter = lerp_bearing(350.0, 10.0, 0.25);
    assert!((quarter - 355.0).abs() < 1e-9);
}
