use super::*;
use crate::foundation::core::{Bounds, CameraPose, Edges};
use crate::geo::route::Route;
use crate::surface::{RecordingSurface, SourceGeometry};
use crate::timeline::precalc::precalculate;
use crate::timeline::settings::{AnimationSettings, TransitionMode};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

fn animation() -> Arc<PreCalculatedAnimation> {
    let route = Route::from_lng_lat(&[[0.0, 0.0], [0.01, 0.0], [0.02, 0.01], [0.03, 0.0]]).unwrap();
    let settings = AnimationSettings {
        speed_km_per_s: Some(0.5),
        transition_mode: TransitionMode::Computed,
        ..AnimationSettings::default()
    };
    Arc::new(precalculate(route, &settings).unwrap())
}

fn setup() -> (AnimationController, Arc<RecordingSurface>) {
    let surface = RecordingSurface::new().shared();
    let dyn_surface: Arc<dyn RenderSurface> = surface.clone();
    (AnimationController::new(animation(), dyn_surface), surface)
}

/// Recording surface whose pose changes can be made to fail.
#[derive(Default)]
struct RejectingSurface {
    inner: RecordingSurface,
    reject: AtomicBool,
}

impl RejectingSurface {
    fn set_rejecting(&self, reject: bool) {
        self.reject.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl RenderSurface for RejectingSurface {
    fn set_pose(&self, pose: CameraPose, duration_ms: f64) -> RouteCamResult<()> {
        if self.reject.load(Ordering::SeqCst) {
            return Err(RouteCamError::surface("camera is detached"));
        }
        self.inner.set_pose(pose, duration_ms)
    }

    fn fit_to_bounds(
        &self,
        bounds: Bounds,
        padding: Edges,
        bearing: f64,
        pitch: f64,
        duration_ms: f64,
    ) -> RouteCamResult<()> {
        self.inner
            .fit_to_bounds(bounds, padding, bearing, pitch, duration_ms)
    }

    fn update_source(&self, source_id: &str, geometry: SourceGeometry) -> RouteCamResult<()> {
        self.inner.update_source(source_id, geometry)
    }

    fn is_transition_in_flight(&self) -> bool {
        self.inner.is_transition_in_flight()
    }

    fn stop_transition(&self) {
        self.inner.stop_transition();
    }

    async fn wait_idle(&self) {
        self.inner.wait_idle().await;
    }

    async fn wait_loaded(&self) {
        self.inner.wait_loaded().await;
    }
}

fn rejecting_setup() -> (AnimationController, Arc<RejectingSurface>) {
    let surface = Arc::new(RejectingSurface::default());
    let dyn_surface: Arc<dyn RenderSurface> = surface.clone();
    (AnimationController::new(animation(), dyn_surface), surface)
}

#[tokio::test(start_paused = true)]
async fn runs_to_completion_and_stops() {
    let (mut c, surface) = setup();
    assert_eq!(c.state(), PlaybackState::Idle);
    c.play().await.unwrap();
    assert_eq!(c.state(), PlaybackState::Playing);
    c.wait().await.unwrap();

    let status = c.status();
    assert_eq!(status.state, PlaybackState::Stopped);
    assert_eq!(status.elapsed_ms, c.animation().total_duration_ms());
    assert_eq!(surface.current_pose(), c.animation().final_pose());
}

#[tokio::test(start_paused = true)]
async fn pause_and_resume_keep_elapsed_continuous() {
    let (mut c, _surface) = setup();
    c.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(3000)).await;
    c.pause().await.unwrap();
    assert_eq!(c.status().elapsed_ms, 3000.0);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(c.status().elapsed_ms, 3000.0);
    c.resume().await.unwrap();
    assert_eq!(c.status().state, PlaybackState::Playing);
    assert_eq!(c.status().elapsed_ms, 3000.0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(c.status().elapsed_ms, 3500.0);
}

#[tokio::test(start_paused = true)]
async fn invalid_transitions_are_rejected() {
    let (mut c, _surface) = setup();
    assert!(matches!(c.pause().await, Err(RouteCamError::InvalidInput(_))));
    assert!(c.resume().await.is_err());

    c.play().await.unwrap();
    assert!(c.resume().await.is_err());
    c.pause().await.unwrap();
    assert!(c.pause().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn play_is_idempotent_and_resumes_when_paused() {
    let (mut c, _surface) = setup();
    c.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    c.play().await.unwrap();
    assert_eq!(c.status().elapsed_ms, 1000.0);

    c.pause().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    c.play().await.unwrap();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.status().elapsed_ms, 1000.0);
}

#[tokio::test(start_paused = true)]
async fn stop_resets_camera_to_first_pose() {
    let (mut c, surface) = setup();
    c.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(4000)).await;
    c.stop().await.unwrap();

    let status = c.status();
    assert_eq!(status.state, PlaybackState::Stopped);
    assert_eq!(status.elapsed_ms, 0.0);
    assert_eq!(surface.current_pose(), c.animation().initial_pose());
    assert!(c.token().is_none());
}

#[tokio::test(start_paused = true)]
async fn replay_starts_over() {
    let (mut c, _surface) = setup();
    c.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    c.replay().await.unwrap();
    assert_eq!(c.state(), PlaybackState::Playing);
    assert_eq!(c.status().elapsed_ms, 0.0);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(c.status().elapsed_ms, 100.0);
}

#[tokio::test(start_paused = true)]
async fn external_cancellation_reaches_the_caller() {
    let (mut c, _surface) = setup();
    c.play().await.unwrap();
    let token = c.token().unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    token.cancel();

    let r = c.wait().await;
    assert!(r.unwrap_err().is_cancelled());
    assert_eq!(c.state(), PlaybackState::Stopped);
}

#[tokio::test(start_paused = true)]
async fn subscribers_see_natural_completion() {
    let (mut c, _surface) = setup();
    let mut rx = c.subscribe();
    c.play().await.unwrap();
    rx.wait_for(|p| p.state == PlaybackState::Stopped)
        .await
        .unwrap();
    assert_eq!(c.status().elapsed_ms, c.animation().total_duration_ms());
}

#[tokio::test(start_paused = true)]
async fn failed_run_keeps_its_position() {
    let (mut c, surface) = rejecting_setup();
    c.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1000)).await;
    surface.set_rejecting(true);

    let r = c.wait().await;
    assert!(matches!(r, Err(RouteCamError::Surface(_))));
    let status = c.status();
    assert_eq!(status.state, PlaybackState::Stopped);
    assert!(status.elapsed_ms >= 1000.0);
    assert!(status.elapsed_ms < 1100.0, "{}", status.elapsed_ms);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(c.status().elapsed_ms, status.elapsed_ms);
}

#[tokio::test(start_paused = true)]
async fn stop_settles_state_even_when_the_surface_rejects_the_reset() {
    let (mut c, surface) = rejecting_setup();
    c.play().await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    surface.set_rejecting(true);

    assert!(matches!(c.stop().await, Err(RouteCamError::Surface(_))));
    assert_eq!(c.state(), PlaybackState::Stopped);
    assert_eq!(c.status().elapsed_ms, 0.0);
    assert!(c.token().is_none());

    surface.set_rejecting(false);
    c.play().await.unwrap();
    assert_eq!(c.state(), PlaybackState::Playing);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(c.status().elapsed_ms, 200.0);
}
