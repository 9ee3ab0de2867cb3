//! Collaborator interfaces the engine drives: the map surface, the frame capture step, and the
//! display refresh clock.
//!
//! The engine only issues commands and awaits the surface's signals; it never draws anything.
//! [`recording`] holds in-memory implementations used by tests and the CLI dry-run.

use async_trait::async_trait;

use crate::foundation::core::{Bounds, CameraPose, Edges, LngLat};
use crate::foundation::error::RouteCamResult;

pub mod clock;
pub mod recording;

/// Live source carrying the covered part of the route as a line.
pub const ROUTE_PROGRESS_SOURCE: &str = "route-progress";
/// Live source carrying the current position as a point.
pub const ROUTE_POSITION_SOURCE: &str = "route-position";

/// Geometry pushed into a named live data source.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum SourceGeometry {
    LineString(Vec<LngLat>),
    Point(LngLat),
}

/// A map-drawing surface that accepts camera commands and data source updates.
///
/// Command methods return immediately; a non-zero `duration_ms` starts an animated transition
/// whose completion is observed through [`RenderSurface::wait_idle`].
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Move the camera. `duration_ms == 0` must jump without animating.
    fn set_pose(&self, pose: CameraPose, duration_ms: f64) -> RouteCamResult<()>;

    fn fit_to_bounds(
        &self,
        bounds: Bounds,
        padding: Edges,
        bearing: f64,
        pitch: f64,
        duration_ms: f64,
    ) -> RouteCamResult<()>;

    fn update_source(&self, source_id: &str, geometry: SourceGeometry) -> RouteCamResult<()>;

    fn is_transition_in_flight(&self) -> bool;

    /// Halt any animated transition where it is.
    fn stop_transition(&self);

    /// Resolves once the surface has no transition in flight and has finished rendering.
    async fn wait_idle(&self);

    /// Resolves once the surface has loaded its style and sources.
    async fn wait_loaded(&self);
}

/// Export-only capture step: one `request_frame_at` then one `frame_ready` per output frame.
#[async_trait]
pub trait FrameCapture: Send + Sync {
    fn request_frame_at(&self, timestamp_ms: f64) -> RouteCamResult<()>;

    async fn frame_ready(&self) -> RouteCamResult<()>;
}

/// Push the covered route line and the current position to their live sources.
pub fn publish_progress(
    surface: &dyn RenderSurface,
    covered: Vec<LngLat>,
    position: LngLat,
) -> RouteCamResult<()> {
    surface.update_source(ROUTE_PROGRESS_SOURCE, SourceGeometry::LineString(covered))?;
    surface.update_source(ROUTE_POSITION_SOURCE, SourceGeometry::Point(position))
}

pub use clock::{FrameClock, IntervalFrameClock};
pub use recording::{CapturedFrame, RecordingCapture, RecordingSurface, SurfaceCommand};
