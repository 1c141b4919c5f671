//! Animation driver: owns the frame loop, the phase and the resize path

use super::phase::{PhaseIntegrator, PhaseMode};
use super::render::{Canvas, FrameRenderer, FrameStats, Surface};
use super::scheduler::{FrameHandle, FrameScheduler};
use crate::config::WaveSettings;
use log::{debug, trace};
use std::cell::Cell;
use std::rc::Rc;

/// Latest settings snapshot, written by the settings side and read once per tick.
/// Publishing swaps the whole value, so a tick never sees half an update.
#[derive(Clone, Debug, Default)]
pub struct SettingsSlot(Rc<Cell<WaveSettings>>);

impl SettingsSlot {
    pub fn new(settings: WaveSettings) -> Self {
        Self(Rc::new(Cell::new(settings)))
    }

    pub fn publish(&self, settings: WaveSettings) {
        self.0.set(settings);
    }

    pub fn snapshot(&self) -> WaveSettings {
        self.0.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DriverState {
    Idle,
    Running,
}

/// One animated view. Dropping it discards the phase; a new driver starts at zero.
pub struct AnimationDriver {
    slot: SettingsSlot,
    integrator: PhaseIntegrator,
    renderer: FrameRenderer,
    state: DriverState,
    pending: Option<FrameHandle>,
    frames: u64,
}

impl AnimationDriver {
    pub fn new(slot: SettingsSlot, phase_mode: PhaseMode) -> Self {
        Self::with_integrator(slot, PhaseIntegrator::new(phase_mode))
    }

    pub fn with_integrator(slot: SettingsSlot, integrator: PhaseIntegrator) -> Self {
        Self {
            slot,
            integrator,
            renderer: FrameRenderer::new(),
            state: DriverState::Idle,
            pending: None,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn normalized_phase(&self) -> f64 {
        self.integrator.normalized_phase()
    }

    /// Frames delivered since construction
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Size the canvas for its displayed surface and schedule the first tick
    pub fn start<C, S>(&mut self, canvas: Option<&mut C>, surface: Surface, scheduler: &mut S)
    where
        C: Canvas + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.is_running() {
            return;
        }
        if let Some(canvas) = canvas {
            canvas.resize(surface);
        }
        self.integrator.reset_clock();
        self.state = DriverState::Running;
        self.pending = Some(scheduler.request_frame());
        debug!(
            "animation started at phase {:.3} ({:?}) on {:?}",
            self.integrator.normalized_phase(),
            self.integrator.mode(),
            surface
        );
    }

    /// Cancel the scheduled tick. Safe to call repeatedly or before `start`.
    pub fn stop<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        if self.is_running() {
            debug!("animation stopped after {} frames", self.frames);
        }
        self.state = DriverState::Idle;
    }

    /// Run one tick for a delivered frame: snapshot, phase, draw, reschedule.
    /// Frames that are not the pending one are ignored.
    pub fn on_frame<C, S>(
        &mut self,
        handle: FrameHandle,
        now: f64,
        canvas: Option<&mut C>,
        scheduler: &mut S,
    ) -> Option<FrameStats>
    where
        C: Canvas + ?Sized,
        S: FrameScheduler + ?Sized,
    {
        if self.pending != Some(handle) {
            trace!("ignoring stale frame {:?}", handle);
            return None;
        }
        self.pending = None;
        self.frames += 1;

        let settings = self.slot.snapshot();
        self.integrator.tick(settings.params.speed, now);
        let stats = self.draw(canvas, &settings);

        self.pending = Some(scheduler.request_frame());
        stats
    }

    /// Draw the current phase without advancing it (paused or resized views)
    pub fn redraw<C: Canvas + ?Sized>(&mut self, canvas: Option<&mut C>) -> Option<FrameStats> {
        let settings = self.slot.snapshot();
        self.draw(canvas, &settings)
    }

    /// Apply a new displayed size. Phase is untouched.
    pub fn resize<C: Canvas + ?Sized>(&mut self, canvas: &mut C, surface: Surface) {
        canvas.resize(surface);
        debug!(
            "canvas resized to {:?} backing pixels at scale {}",
            canvas.backing_size(),
            canvas.scale()
        );
    }

    fn draw<C: Canvas + ?Sized>(
        &mut self,
        canvas: Option<&mut C>,
        settings: &WaveSettings,
    ) -> Option<FrameStats> {
        let Some(canvas) = canvas.filter(|c| c.has_area()) else {
            trace!("no drawable canvas, skipping frame");
            return None;
        };
        let phase = self.integrator.actual_phase(settings.params.wavelength);
        let stats = self.renderer.render(canvas, settings, phase);
        trace!("frame {}: {:?}", self.frames, stats);
        Some(stats)
    }
}
