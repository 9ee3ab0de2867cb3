use super::*;
use approx::assert_relative_eq;

fn p(x: f64, y: f64) -> LngLat {
    Point::new(x, y)
}

#[test]
fn distance_is_symmetric_and_zero_for_identical_points() {
    let a = p(13.40, 52.52);
    let b = p(2.35, 48.86);
    assert_relative_eq!(distance(a, b), distance(b, a), epsilon = 1e-9);
    assert_eq!(distance(a, a), 0.0);
    // Berlin -> Paris is roughly 878 km
    assert!((distance(a, b) - 878.0).abs() < 5.0);
}

#[test]
fn one_degree_of_longitude_on_the_equator() {
    let d = distance(p(0.0, 0.0), p(1.0, 0.0));
    assert_relative_eq!(d, 111.195, epsilon = 0.01);
}

#[test]
fn path_length_sums_segments() {
    let path = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
    assert_relative_eq!(
        path_length(&path),
        2.0 * distance(p(0.0, 0.0), p(1.0, 0.0)),
        epsilon = 1e-9
    );
    assert_eq!(path_length(&path[..1]), 0.0);
    assert_eq!(path_length(&[]), 0.0);
}

#[test]
fn point_at_distance_clamps_to_extent() {
    let path = [p(0.0, 0.0), p(1.0, 0.0)];
    assert_eq!(point_at_distance(&path, -5.0), p(0.0, 0.0));
    assert_eq!(point_at_distance(&path, 1e9), p(1.0, 0.0));
    let half = point_at_distance(&path, path_length(&path) / 2.0);
    assert_relative_eq!(half.x, 0.5, epsilon = 1e-9);
    assert_relative_eq!(half.y, 0.0, epsilon = 1e-12);
}

#[test]
fn point_at_distance_handles_degenerate_paths() {
    assert_eq!(point_at_distance(&[], 3.0), Point::ZERO);
    assert_eq!(point_at_distance(&[p(4.0, 5.0)], 3.0), p(4.0, 5.0));
    let same = [p(4.0, 5.0), p(4.0, 5.0)];
    assert_eq!(point_at_distance(&same, 3.0), p(4.0, 5.0));
}

#[test]
fn bearing_cardinal_directions() {
    assert_relative_eq!(bearing(p(0.0, 0.0), p(0.0, 1.0)), 0.0, epsilon = 1e-9);
    assert_relative_eq!(bearing(p(0.0, 0.0), p(1.0, 0.0)), 90.0, epsilon = 1e-9);
    assert_relative_eq!(bearing(p(0.0, 1.0), p(0.0, 0.0)), 180.0, epsilon = 1e-9);
    assert_relative_eq!(bearing(p(1.0, 0.0), p(0.0, 0.0)), 270.0, epsilon = 1e-9);
}

#[test]
fn bearing_of_identical_points_is_zero() {
    assert_eq!(bearing(p(7.0, 7.0), p(7.0, 7.0)), 0.0);
}

#[test]
fn slice_to_distance_appends_boundary_point() {
    let path = [p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)];
    let cum = cumulative_distances(&path);
    let start = slice_to_distance(&path, &cum, 0.0);
    assert_eq!(start, vec![p(0.0, 0.0)]);

    let mid = slice_to_distance(&path, &cum, cum[1] * 1.5);
    assert_eq!(mid.len(), 3);
    assert_relative_eq!(mid[2].x, 1.5, epsilon = 1e-9);

    let full = slice_to_distance(&path, &cum, cum[2]);
    assert_eq!(full, path.to_vec());
}

#[test]
fn bounds_cover_every_point() {
    let b = bounds(&[p(1.0, 5.0), p(-2.0, 3.0), p(4.0, -1.0)]);
    assert_eq!((b.x0, b.y0, b.x1, b.y1), (-2.0, -1.0, 4.0, 5.0));
    assert_eq!(bounds(&[]), Bounds::ZERO);
}
