//! Platform abstraction layer
//!
//! Handles the host side of the field:
//! - Frame scheduling and cancellation
//! - Mount/unmount lifecycle
//! - Frame-time to simulation-step mapping
//! - Browser event wiring (wasm32 only)

pub mod clock;
pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::FrameClock;
pub use headless::HeadlessScheduler;

use glam::Vec2;

use crate::config::FieldConfig;
use crate::error::Result;
use crate::renderer::{Surface, draw_field};
use crate::sim::{Field, Viewport};

/// Handle returned when a frame is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub i32);

/// The host's "call me on the next display frame" primitive
pub trait FrameScheduler {
    fn request(&mut self) -> FrameId;
    fn cancel(&mut self, id: FrameId);
}

/// Lifecycle of a mounted field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Unmounted,
    /// Ticking; `pending` is the outstanding frame request
    Running { pending: Option<FrameId> },
}

/// Field + surface + scheduler, driven one frame at a time
pub struct FieldLoop<S: Surface, F: FrameScheduler> {
    field: Field,
    surface: Option<S>,
    scheduler: F,
    clock: FrameClock,
    state: LoopState,
    /// Frames rendered since construction
    frames: u64,
}

impl<S: Surface, F: FrameScheduler> FieldLoop<S, F> {
    /// `surface` is `None` when the host has nothing to draw on; the loop
    /// then refuses to start instead of failing the page.
    pub fn new(config: FieldConfig, surface: Option<S>, scheduler: F) -> Result<Self> {
        let clock = FrameClock::new(config.timestep);
        Ok(Self {
            field: Field::new(config)?,
            surface,
            scheduler,
            clock,
            state: LoopState::Unmounted,
            frames: 0,
        })
    }

    /// Mount: lay out the lattice and request the first frame.
    ///
    /// Returns whether the loop is running afterwards. Starting twice is a
    /// no-op.
    pub fn start(&mut self, viewport: Viewport) -> bool {
        if self.is_running() {
            return true;
        }
        let Some(surface) = self.surface.as_mut() else {
            log::warn!("No drawing surface; particle field disabled");
            return false;
        };

        surface.resize(viewport);
        self.field.resize(viewport);
        self.field.pointer_left();
        self.clock.reset();
        let pending = Some(self.scheduler.request());
        self.state = LoopState::Running { pending };

        log::info!(
            "Particle field mounted: {} points for {}x{}",
            self.field.points().len(),
            viewport.width,
            viewport.height
        );
        true
    }

    /// Unmount: cancel the outstanding frame. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let LoopState::Running { pending } = self.state {
            if let Some(id) = pending {
                self.scheduler.cancel(id);
            }
            self.state = LoopState::Unmounted;
            log::info!("Particle field unmounted after {} frames", self.frames);
        }
    }

    /// Frame callback: step, clear, draw, then request the next frame.
    /// `time_ms` is the host frame timestamp.
    pub fn frame(&mut self, time_ms: f64) {
        if !self.is_running() {
            return;
        }
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let steps = self.clock.advance(time_ms);
        for _ in 0..steps {
            self.field.step();
        }

        surface.clear();
        draw_field(&self.field, surface);
        self.frames += 1;

        let pending = Some(self.scheduler.request());
        self.state = LoopState::Running { pending };
    }

    /// Viewport changed: rebuild the lattice and resize the surface
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.is_running() {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport);
        }
        self.field.resize(viewport);
        log::info!("Particle field resized to {}x{}", viewport.width, viewport.height);
    }

    /// Swap in a new config. The lattice is rebuilt at rest for the current
    /// viewport and the pointer carries over. On error the running field is
    /// left untouched.
    pub fn set_config(&mut self, config: FieldConfig) -> Result<()> {
        let mut field = Field::new(config)?;
        if self.is_running() {
            let viewport = self.field.viewport();
            field.resize(viewport);
            if let Some(surface) = self.surface.as_mut() {
                surface.resize(viewport);
            }
        }
        if self.field.pointer_active() {
            field.pointer_moved(self.field.pointer());
        }

        self.clock = FrameClock::new(field.config().timestep);
        self.field = field;
        log::info!(
            "Field config applied: spacing {}, {} points",
            self.field.config().spacing,
            self.field.points().len()
        );
        Ok(())
    }

    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.field.pointer_moved(pos);
    }

    pub fn pointer_left(&mut self) {
        self.field.pointer_left();
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timestep;
    use crate::error::FieldError;
    use crate::renderer::Raster;

    type TestLoop = FieldLoop<Raster, HeadlessScheduler>;

    fn mounted() -> TestLoop {
        let mut lp = FieldLoop::new(
            FieldConfig::default(),
            Some(Raster::default()),
            HeadlessScheduler::default(),
        )
        .unwrap();
        assert!(lp.start(Viewport::new(800, 600)));
        lp
    }

    #[test]
    fn test_start_requests_one_frame() {
        let lp = mounted();
        assert_eq!(lp.scheduler().requested(), 1);
        assert!(lp.scheduler().pending().is_some());
        assert_eq!(lp.field().points().len(), 374);
        assert_eq!(lp.surface().unwrap().width(), 800);
    }

    #[test]
    fn test_frames_reschedule() {
        let mut lp = mounted();
        for i in 0..5 {
            assert!(headless::pump(&mut lp, i as f64 * 16.0));
        }
        assert_eq!(lp.frames(), 5);
        assert_eq!(lp.scheduler().requested(), 6);
        assert!(lp.surface().unwrap().painted() > 0);
    }

    #[test]
    fn test_no_tick_after_stop() {
        let mut lp = mounted();
        headless::pump(&mut lp, 0.0);
        headless::pump(&mut lp, 16.0);
        lp.stop();

        assert_eq!(lp.state(), LoopState::Unmounted);
        assert!(lp.scheduler().pending().is_none());
        assert_eq!(lp.scheduler().cancelled(), 1);

        for i in 0..10 {
            assert!(!headless::pump(&mut lp, 32.0 + i as f64 * 16.0));
        }
        assert_eq!(lp.frames(), 2);
    }

    #[test]
    fn test_stale_callback_ignored() {
        let mut lp = mounted();
        lp.stop();
        // A callback the platform had already queued still fires
        lp.frame(100.0);
        assert_eq!(lp.frames(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut lp = mounted();
        lp.stop();
        lp.stop();
        assert_eq!(lp.scheduler().cancelled(), 1);
    }

    #[test]
    fn test_double_start_keeps_single_request() {
        let mut lp = mounted();
        assert!(lp.start(Viewport::new(800, 600)));
        assert_eq!(lp.scheduler().requested(), 1);
    }

    #[test]
    fn test_restart_after_stop() {
        let mut lp = mounted();
        headless::pump(&mut lp, 0.0);
        lp.stop();
        assert!(lp.start(Viewport::new(640, 480)));
        assert!(headless::pump(&mut lp, 16.0));
        assert_eq!(lp.frames(), 2);
        assert_eq!(lp.field().viewport(), Viewport::new(640, 480));
    }

    #[test]
    fn test_missing_surface_is_noop() {
        let mut lp: TestLoop =
            FieldLoop::new(FieldConfig::default(), None, HeadlessScheduler::default()).unwrap();
        assert!(!lp.start(Viewport::new(800, 600)));
        assert_eq!(lp.state(), LoopState::Unmounted);
        assert_eq!(lp.scheduler().requested(), 0);
        lp.frame(0.0);
        assert_eq!(lp.frames(), 0);
    }

    #[test]
    fn test_resize_rebuilds_at_rest() {
        let mut lp = mounted();
        lp.pointer_moved(Vec2::new(400.0, 300.0));
        for i in 0..10 {
            headless::pump(&mut lp, i as f64 * 16.0);
        }
        assert!(lp.field().max_displacement() > 0.0);

        lp.resize(Viewport::new(1280, 720));
        assert_eq!(lp.surface().unwrap().width(), 1280);
        assert_eq!(lp.field().max_displacement(), 0.0);
        assert!(lp.is_running());
    }

    #[test]
    fn test_set_config_relays_out_running_field() {
        let mut lp = mounted();
        lp.pointer_moved(Vec2::new(400.0, 300.0));
        for i in 0..10 {
            headless::pump(&mut lp, i as f64 * 16.0);
        }

        let config = FieldConfig {
            spacing: 80.0,
            ..Default::default()
        };
        lp.set_config(config).unwrap();

        // 800x600 at 80: 12 cols x 9 rows, at rest
        assert_eq!(lp.field().points().len(), 108);
        assert_eq!(lp.field().config().spacing, 80.0);
        assert_eq!(lp.field().max_displacement(), 0.0);
        assert_eq!(lp.field().pointer(), Vec2::new(400.0, 300.0));
        assert!(lp.is_running());

        assert!(headless::pump(&mut lp, 200.0));
        assert!(lp.field().max_displacement() > 0.0);
    }

    #[test]
    fn test_rejected_config_keeps_field() {
        let mut lp = mounted();
        let before = lp.field().config().clone();

        let bad = FieldConfig {
            spacing: 1e-3,
            ..Default::default()
        };
        assert!(matches!(
            lp.set_config(bad),
            Err(FieldError::OutOfRange { name: "spacing", .. })
        ));
        assert_eq!(lp.field().config(), &before);
        assert_eq!(lp.field().points().len(), 374);
        assert!(headless::pump(&mut lp, 0.0));
    }

    #[test]
    fn test_set_config_before_start() {
        let mut lp: TestLoop = FieldLoop::new(
            FieldConfig::default(),
            Some(Raster::default()),
            HeadlessScheduler::default(),
        )
        .unwrap();
        let config = FieldConfig {
            spacing: 80.0,
            ..Default::default()
        };
        lp.set_config(config).unwrap();
        assert!(lp.field().points().is_empty());

        assert!(lp.start(Viewport::new(800, 600)));
        assert_eq!(lp.field().points().len(), 108);
    }

    #[test]
    fn test_fixed_timestep_runs_substeps() {
        let fixed_config = FieldConfig {
            timestep: Timestep::Fixed { hz: 64.0 },
            ..Default::default()
        };
        let mut per_frame: TestLoop = FieldLoop::new(
            FieldConfig::default(),
            Some(Raster::default()),
            HeadlessScheduler::default(),
        )
        .unwrap();
        let mut fixed: TestLoop =
            FieldLoop::new(fixed_config, Some(Raster::default()), HeadlessScheduler::default())
                .unwrap();
        per_frame.start(Viewport::new(800, 600));
        fixed.start(Viewport::new(800, 600));

        let pointer = Vec2::new(400.0, 300.0);
        per_frame.pointer_moved(pointer);
        fixed.pointer_moved(pointer);

        // 32 Hz display against 64 Hz updates: one step on the first frame,
        // then two per frame, so 5 frames make 9 updates
        for i in 0..5 {
            headless::pump(&mut fixed, i as f64 * 31.25);
        }
        for i in 0..9 {
            headless::pump(&mut per_frame, i as f64 * 16.0);
        }
        assert_eq!(fixed.frames(), 5);
        assert_eq!(per_frame.frames(), 9);
        assert_eq!(fixed.field().points(), per_frame.field().points());
    }
}
