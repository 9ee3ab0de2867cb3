//! Route geometry.

/// Pure great-circle helpers.
pub mod geometry;
/// Validated route polyline.
pub mod route;
