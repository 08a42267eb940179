use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::motion::position;
use crate::params::SimulationParameters;

/// Decimal places kept on sample times so tooltips and exported tables stay
/// stable across float noise.
pub const TIME_DECIMALS: i32 = 2;

/// Upper bound on the table length. Windows needing more points are
/// truncated here and rejected by `SimulationConfig::sanitized`.
pub const MAX_SAMPLES: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSample {
    pub t: f64,
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformWindow {
    pub total_t: f64,
    pub dt: f64,
}

impl Default for WaveformWindow {
    fn default() -> Self {
        Self {
            total_t: 8.0,
            dt: 0.02,
        }
    }
}

impl WaveformWindow {
    pub fn is_usable(&self) -> bool {
        self.dt.is_finite() && self.dt > 0.0 && self.total_t.is_finite() && self.total_t >= self.dt
    }

    fn steps(&self) -> f64 {
        if !(self.dt.is_finite() && self.dt > 0.0 && self.total_t.is_finite() && self.total_t >= 0.0) {
            return 0.0;
        }
        (self.total_t / self.dt + 1e-9).floor()
    }

    pub fn fits_table(&self) -> bool {
        self.steps() < MAX_SAMPLES as f64
    }

    pub fn sample_count(&self) -> usize {
        let steps = self.steps().min((MAX_SAMPLES - 1) as f64);
        (steps as usize).saturating_add(1)
    }

    /// Sample time of index `i`. Computed as `i·dt` rather than by repeated
    /// addition so the last point lands on `total_t`.
    pub fn time_at(&self, index: usize) -> f64 {
        round_to(index as f64 * self.dt, TIME_DECIMALS)
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Lazy, finite sequence of samples for one parameter set. Cloning restarts
/// it from wherever the clone was taken.
#[derive(Debug, Clone)]
pub struct Samples {
    params: SimulationParameters,
    window: WaveformWindow,
    front: usize,
    back: usize,
}

impl Samples {
    pub fn new(params: SimulationParameters, window: WaveformWindow) -> Self {
        Self {
            params,
            window,
            front: 0,
            back: window.sample_count(),
        }
    }

    fn sample(&self, index: usize) -> WaveformSample {
        let tau = index as f64 * self.window.dt;
        WaveformSample {
            t: self.window.time_at(index),
            x: position(&self.params, tau),
        }
    }
}

impl Iterator for Samples {
    type Item = WaveformSample;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let sample = self.sample(self.front);
        self.front += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for Samples {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.sample(self.back))
    }
}

impl ExactSizeIterator for Samples {}

pub fn samples(params: &SimulationParameters, window: &WaveformWindow) -> Samples {
    Samples::new(*params, *window)
}

pub fn generate_waveform(params: &SimulationParameters, window: &WaveformWindow) -> Vec<WaveformSample> {
    samples(params, window).collect()
}

/// Owns the waveform table and rebuilds it only when the parameters or the
/// window differ from the ones it was built for.
#[derive(Debug, Default)]
pub struct Sampler {
    window: WaveformWindow,
    cached: Option<CachedTable>,
    regenerations: u64,
}

#[derive(Debug)]
struct CachedTable {
    params: SimulationParameters,
    window: WaveformWindow,
    table: Arc<[WaveformSample]>,
}

impl Sampler {
    pub fn new(window: WaveformWindow) -> Self {
        Self {
            window,
            cached: None,
            regenerations: 0,
        }
    }

    pub fn window(&self) -> WaveformWindow {
        self.window
    }

    pub fn set_window(&mut self, window: WaveformWindow) {
        self.window = window;
    }

    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn is_stale(&self, params: &SimulationParameters) -> bool {
        match &self.cached {
            Some(cached) => cached.params != *params || cached.window != self.window,
            None => true,
        }
    }

    pub fn table(&mut self, params: &SimulationParameters) -> Arc<[WaveformSample]> {
        if let Some(cached) = &self.cached {
            if cached.params == *params && cached.window == self.window {
                return Arc::clone(&cached.table);
            }
        }
        let table: Arc<[WaveformSample]> = generate_waveform(params, &self.window).into();
        self.regenerations += 1;
        tracing::debug!(
            samples = table.len(),
            regenerations = self.regenerations,
            "regenerated waveform table"
        );
        self.cached = Some(CachedTable {
            params: *params,
            window: self.window,
            table: Arc::clone(&table),
        });
        table
    }

    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
