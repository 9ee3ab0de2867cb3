use crate::foundation::core::{Bounds, LngLat, Point};
use crate::foundation::error::{RouteCamError, RouteCamResult};
use crate::geo::geometry::{
    bearing, bounds, covered_vertex_count, cumulative_distances, partial_path,
    point_at_distance_with, slice_to_distance,
};

/// Ordered `(longitude, latitude)` polyline with cached cumulative distances.
///
/// Construction validates the input, so every `Route` has at least two finite points with a
/// latitude inside `[-90, 90]`. A route whose points all coincide is still accepted; callers treat
/// it as degenerate geometry and hold the start pose.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RouteRepr", into = "RouteRepr")]
pub struct Route {
    coordinates: Vec<LngLat>,
    cumulative_km: Vec<f64>,
}

impl Route {
    pub fn new(coordinates: Vec<LngLat>) -> RouteCamResult<Self> {
        if coordinates.len() < 2 {
            return Err(RouteCamError::invalid_input(format!(
                "route needs at least 2 points, got {}",
                coordinates.len()
            )));
        }
        if let Some((i, p)) = coordinates
            .iter()
            .enumerate()
            .find(|(_, p)| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(RouteCamError::invalid_input(format!(
                "route point {i} has non-finite coordinates ({}, {})",
                p.x, p.y
            )));
        }
        if let Some((i, p)) = coordinates
            .iter()
            .enumerate()
            .find(|(_, p)| !(-90.0..=90.0).contains(&p.y))
        {
            return Err(RouteCamError::invalid_input(format!(
                "route point {i} latitude {} is outside [-90, 90]",
                p.y
            )));
        }

        let cumulative_km = cumulative_distances(&coordinates);
        Ok(Self {
            coordinates,
            cumulative_km,
        })
    }

    pub fn from_lng_lat(pairs: &[[f64; 2]]) -> RouteCamResult<Self> {
        Self::new(pairs.iter().map(|[x, y]| Point::new(*x, *y)).collect())
    }

    pub fn coordinates(&self) -> &[LngLat] {
        &self.coordinates
    }

    pub fn cumulative_km(&self) -> &[f64] {
        &self.cumulative_km
    }

    pub fn length_km(&self) -> f64 {
        self.cumulative_km.last().copied().unwrap_or(0.0)
    }

    /// `true` when the route has no measurable length.
    pub fn is_degenerate(&self) -> bool {
        self.length_km() <= f64::EPSILON
    }

    pub fn start(&self) -> LngLat {
        self.coordinates[0]
    }

    pub fn end(&self) -> LngLat {
        self.coordinates[self.coordinates.len() - 1]
    }

    pub fn bounds(&self) -> Bounds {
        bounds(&self.coordinates)
    }

    /// Position `distance_km` along the route, clamped to its extent.
    pub fn point_at(&self, distance_km: f64) -> LngLat {
        point_at_distance_with(&self.coordinates, &self.cumulative_km, distance_km)
    }

    /// Vertices covered by `distance_km` plus the interpolated boundary point.
    pub fn slice_to(&self, distance_km: f64) -> Vec<LngLat> {
        slice_to_distance(&self.coordinates, &self.cumulative_km, distance_km)
    }

    /// How many leading vertices lie strictly before `distance_km` (at least one).
    pub fn covered_vertices(&self, distance_km: f64) -> usize {
        covered_vertex_count(&self.cumulative_km, distance_km)
    }

    /// The first `covered` vertices followed by `boundary`, without repeating the last vertex.
    pub fn partial(&self, covered: usize, boundary: LngLat) -> Vec<LngLat> {
        partial_path(&self.coordinates, covered, boundary)
    }

    /// Heading of the first non-degenerate segment, or `0` for a degenerate route.
    pub fn initial_bearing(&self) -> f64 {
        self.coordinates
            .windows(2)
            .find(|w| w[0] != w[1])
            .map(|w| bearing(w[0], w[1]))
            .unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct RouteRepr {
    coordinates: Vec<Vec<f64>>,
}

impl TryFrom<RouteRepr> for Route {
    type Error = RouteCamError;

    fn try_from(repr: RouteRepr) -> Result<Self, Self::Error> {
        let points = repr
            .coordinates
            .iter()
            .enumerate()
            .map(|(i, c)| match c.as_slice() {
                // GeoJSON positions may carry elevation as a third member
                [x, y, ..] => Ok(Point::new(*x, *y)),
                _ => Err(RouteCamError::invalid_input(format!(
                    "route position {i} must have at least 2 members"
                ))),
            })
            .collect::<RouteCamResult<Vec<_>>>()?;
        Route::new(points)
    }
}

impl From<Route> for RouteRepr {
    fn from(route: Route) -> Self {
        Self {
            coordinates: route
                .coordinates
                .into_iter()
                .map(|p| vec![p.x, p.y])
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/route.rs"]
mod tests;
