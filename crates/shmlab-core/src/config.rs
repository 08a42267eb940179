use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::params::SimulationParameters;
use crate::sampler::WaveformWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub parameters: SimulationParameters,
    pub window: WaveformWindow,
    pub frame_rate_hz: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            parameters: SimulationParameters::default(),
            window: WaveformWindow::default(),
            frame_rate_hz: 60.0,
        }
    }
}

impl SimulationConfig {
    /// Falls back to defaults for a window or frame rate that cannot drive
    /// the simulation.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.parameters = self.parameters.sanitized();
        if !(self.window.is_usable() && self.window.fits_table()) {
            tracing::warn!(window = ?self.window, "unusable waveform window, using default");
            self.window = defaults.window;
        }
        if !(self.frame_rate_hz.is_finite() && self.frame_rate_hz > 0.0) {
            self.frame_rate_hz = defaults.frame_rate_hz;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub config: SimulationConfig,
}

impl Preset {
    pub fn new(name: impl Into<String>, parameters: SimulationParameters) -> Self {
        Self {
            name: name.into(),
            config: SimulationConfig {
                parameters,
                ..SimulationConfig::default()
            },
        }
    }

    /// Whether `config` still holds this preset's values, e.g. after a
    /// slider edit that was later undone.
    pub fn matches(&self, config: &SimulationConfig) -> bool {
        self.config.parameters == config.parameters && self.config.window == config.window
    }
}

pub fn default_presets() -> Vec<Preset> {
    vec![
        Preset::new("Default", SimulationParameters::default()),
        Preset::new("Slow and wide", SimulationParameters::clamped(200.0, 0.2, 0.0)),
        Preset::new("Fast and narrow", SimulationParameters::clamped(40.0, 2.0, 0.0)),
        Preset::new("Quarter-cycle lead", SimulationParameters::clamped(120.0, 0.5, FRAC_PI_2)),
        Preset::new("Starts at equilibrium", SimulationParameters::clamped(120.0, 0.5, -FRAC_PI_2)),
    ]
}

pub fn load_config(path: &Path) -> anyhow::Result<SimulationConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let config: SimulationConfig = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config.sanitized())
}

pub fn save_config(path: &Path, config: &SimulationConfig) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating config {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), config)
        .with_context(|| format!("writing config {}", path.display()))?;
    Ok(())
}

pub fn load_preset(path: &Path) -> anyhow::Result<Preset> {
    let file = File::open(path).with_context(|| format!("opening preset {}", path.display()))?;
    let mut preset: Preset = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing preset {}", path.display()))?;
    preset.config = preset.config.sanitized();
    Ok(preset)
}

pub fn save_preset(path: &Path, preset: &Preset) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("creating preset {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), preset)
        .with_context(|| format!("writing preset {}", path.display()))?;
    Ok(())
}
