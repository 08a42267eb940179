use std::ops::ControlFlow;
use std::sync::Arc;

use crate::clock::{CancelToken, Frame, FrameScheduler, MonotonicTimeSource, SimulationClock, TimeSource};
use crate::config::SimulationConfig;
use crate::motion;
use crate::params::{ParameterStore, ParameterUpdate, SimulationParameters};
use crate::sampler::{Sampler, WaveformSample, WaveformWindow};

/// Parameter store, clock and sampler wired together.
///
/// Ticks only touch the clock: the instantaneous position is evaluated from
/// the latest parameters on every tick, while the waveform table is rebuilt
/// lazily the next time it is requested after a parameter change.
#[derive(Debug)]
pub struct Simulation<S: TimeSource = MonotonicTimeSource> {
    store: ParameterStore,
    clock: SimulationClock<S>,
    sampler: Sampler,
    frame_rate_hz: f64,
}

impl Simulation<MonotonicTimeSource> {
    pub fn with_monotonic_clock(config: &SimulationConfig) -> Self {
        Self::new(config, MonotonicTimeSource::default())
    }
}

impl Default for Simulation<MonotonicTimeSource> {
    fn default() -> Self {
        Self::with_monotonic_clock(&SimulationConfig::default())
    }
}

impl<S: TimeSource> Simulation<S> {
    pub fn new(config: &SimulationConfig, source: S) -> Self {
        let config = config.clone().sanitized();
        Self {
            store: ParameterStore::new(config.parameters),
            clock: SimulationClock::new(source),
            sampler: Sampler::new(config.window),
            frame_rate_hz: config.frame_rate_hz,
        }
    }

    pub fn params(&self) -> SimulationParameters {
        self.store.get()
    }

    pub fn revision(&self) -> u64 {
        self.store.revision()
    }

    pub fn window(&self) -> WaveformWindow {
        self.sampler.window()
    }

    pub fn frame_rate_hz(&self) -> f64 {
        self.frame_rate_hz
    }

    pub fn config(&self) -> SimulationConfig {
        SimulationConfig {
            parameters: self.params(),
            window: self.window(),
            frame_rate_hz: self.frame_rate_hz,
        }
    }

    pub fn apply(&mut self, update: ParameterUpdate) -> bool {
        self.store.apply(update)
    }

    pub fn set_amplitude(&mut self, amplitude: f64) -> bool {
        self.store.set_amplitude(amplitude)
    }

    pub fn set_frequency(&mut self, frequency: f64) -> bool {
        self.store.set_frequency(frequency)
    }

    pub fn set_phase(&mut self, phase: f64) -> bool {
        self.store.set_phase(phase)
    }

    pub fn set_parameters(&mut self, params: SimulationParameters) -> bool {
        self.store.replace(params)
    }

    /// Loads a full configuration. Unlike a parameter change this may also
    /// swap the waveform window; the clock keeps running either way.
    pub fn load_config(&mut self, config: &SimulationConfig) {
        let config = config.clone().sanitized();
        self.store.replace(config.parameters);
        self.sampler.set_window(config.window);
        self.frame_rate_hz = config.frame_rate_hz;
    }

    pub fn start(&mut self) -> CancelToken {
        self.clock.start()
    }

    pub fn cancel(&mut self) {
        self.clock.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.clock.cancel_token()
    }

    pub fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn ticks(&self) -> u64 {
        self.clock.ticks()
    }

    pub fn position(&self) -> f64 {
        motion::position(&self.store.get(), self.clock.elapsed())
    }

    pub fn tick(&mut self) -> Option<Frame> {
        let elapsed = self.clock.tick()?;
        Some(Frame {
            index: self.clock.ticks(),
            elapsed,
            position: motion::position(&self.store.get(), elapsed),
        })
    }

    pub fn waveform(&mut self) -> Arc<[WaveformSample]> {
        let params = self.store.get();
        self.sampler.table(&params)
    }

    pub fn waveform_regenerations(&self) -> u64 {
        self.sampler.regenerations()
    }

    /// Starts the clock unless it is already running, so a token taken from
    /// an earlier `start` keeps working. Returns the number of frames
    /// delivered.
    pub fn run<F, R>(&mut self, scheduler: &mut R, mut on_frame: F) -> u64
    where
        R: FrameScheduler,
        F: FnMut(&mut Self, Frame) -> ControlFlow<()>,
    {
        let token = if self.is_running() {
            self.cancel_token()
        } else {
            self.start()
        };
        let mut delivered = 0;
        while scheduler.wait_for_frame(&token) {
            let Some(frame) = self.tick() else {
                break;
            };
            delivered += 1;
            if on_frame(self, frame).is_break() {
                break;
            }
        }
        self.cancel();
        delivered
    }
}
