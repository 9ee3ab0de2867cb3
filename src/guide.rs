//! # routecam guide
//!
//! A walkthrough of how a route becomes camera motion, and which types own each step.
//! For command-line usage run `routecam --help`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`Route`](crate::Route): an ordered list of `[lng, lat]` points with cumulative distances
//! - [`AnimationSettings`](crate::AnimationSettings): follow strength, speed, export fps and the
//!   overview framing
//! - [`AnimationPhase`](crate::AnimationPhase): one step of camera motion (`FlyTo`,
//!   `FollowPath`, `FitBounds`, `Wait`, `Sync`, `Custom`)
//! - [`PreCalculatedAnimation`](crate::PreCalculatedAnimation): the resolved timeline plus its
//!   keyframe and progress tables
//! - [`RenderSurface`](crate::RenderSurface): whatever actually draws the map
//!
//! The standard timeline is always three phases:
//!
//! 1. fly from the overview down to the route start (2 s, out-cubic)
//! 2. follow the path at constant speed with a damped, look-ahead bearing
//! 3. pull back out to frame the whole route (2 s)
//!
//! ---
//!
//! ## Pre-calculation
//!
//! [`precalculate`](crate::precalculate) (also exported as [`bind`](crate::bind)) validates the
//! settings and does all the expensive work once:
//!
//! - the follow-path duration comes from the speed when one is given, otherwise from
//!   [`follow_path_duration`](crate::follow_path_duration), which scales with length and
//!   [`route_complexity`](crate::route_complexity) and is clamped to
//!   `[MIN_FOLLOW_PATH_MS, MAX_FOLLOW_PATH_MS]`
//! - the follow path is sampled every [`KEYFRAME_INTERVAL_MS`](crate::KEYFRAME_INTERVAL_MS)
//! - route coverage is sampled once per export frame
//!
//! After that, [`sample_at`](crate::PreCalculatedAnimation::sample_at) answers "where is the
//! camera at `t`" with a table lookup. Two calls with the same inputs produce identical tables;
//! [`fingerprint`](crate::PreCalculatedAnimation::fingerprint) hashes them so callers can detect
//! drift cheaply.
//!
//! ### Follow strength
//!
//! `follow_strength` in `[0, 1]` maps linearly onto a [`FollowTuning`](crate::FollowTuning):
//! stronger follow means a shorter look-ahead, lower altitude, steeper pitch and less bearing
//! damping.
//!
//! ### Bearing damping
//!
//! The follow-path heading is never stored globally. Each step is computed from the previous
//! [`FollowPathState`](crate::FollowPathState) via [`damp_bearing`](crate::damp_bearing), which
//! rotates along the shortest arc and is frame-rate independent.
//!
//! ---
//!
//! ## Preview
//!
//! [`AnimationController`](crate::AnimationController) owns one playback at a time:
//!
//! - `play` starts from zero (or resumes when paused)
//! - `pause` records the elapsed position and cancels the running task
//! - `resume` starts a new run from the recorded position
//! - `stop` puts the camera back on the first pose
//! - `replay` is `stop` then `play`
//!
//! Elapsed time starts counting when the surface has loaded, so the reported position always
//! matches the camera. Its state is published through a `tokio::sync::watch` channel; see
//! [`subscribe`](crate::AnimationController::subscribe).
//!
//! Underneath, [`PreviewDriver`](crate::PreviewDriver) ticks a [`FrameClock`](crate::FrameClock)
//! and samples the animation each frame. With [`TransitionMode::Native`](crate::TransitionMode)
//! the fly-to and fit-bounds phases are handed to the surface as one animated transition each;
//! with `Computed` every frame is a jump to a pre-calculated pose.
//!
//! ---
//!
//! ## Export
//!
//! [`ExportDriver`](crate::ExportDriver) walks every frame index `i` and poses the surface at
//! `i × 1000 / fps` ms. The pose never depends on how long the surface took to draw the previous
//! frame; a slow surface only makes the export slower. Each frame is:
//!
//! 1. sampled and applied with a zero-duration pose change
//! 2. allowed to settle (bounded by a timeout)
//! 3. handed to [`FrameCapture`](crate::FrameCapture)
//!
//! [`export_plan`](crate::export_plan) returns the same samples without a surface, which is what
//! the `routecam frames` command and the parity tests compare against.
//!
//! ---
//!
//! ## Cancellation
//!
//! Every long-running call takes a [`CancellationToken`](crate::CancellationToken). When it fires:
//!
//! - in-flight native transitions are stopped so the camera holds in place
//! - the call returns [`RouteCamError::Cancelled`](crate::RouteCamError::Cancelled)
//! - a `Sync` group cancels all of its children together
//!
//! ---
//!
//! ## Surfaces
//!
//! [`RecordingSurface`](crate::RecordingSurface) is an in-memory surface that logs every command
//! and simulates transition timing on the tokio clock. It backs the CLI and the tests. A real map
//! widget implements [`RenderSurface`](crate::RenderSurface) directly; route coverage arrives
//! through [`update_source`](crate::RenderSurface::update_source) on the
//! [`ROUTE_PROGRESS_SOURCE`](crate::ROUTE_PROGRESS_SOURCE) and
//! [`ROUTE_POSITION_SOURCE`](crate::ROUTE_POSITION_SOURCE) ids.
