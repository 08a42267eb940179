//! Strings and constants shared by the renderers. Nothing here feeds back
//! into the simulation.

use crate::params::{Parameter, SimulationParameters, AMPLITUDE_RANGE};
use crate::sampler::WaveformWindow;

pub const AMPLITUDE_COLOR: [u8; 3] = [0xef, 0x44, 0x44];
pub const FREQUENCY_COLOR: [u8; 3] = [0x22, 0xc5, 0x5e];
pub const PHASE_COLOR: [u8; 3] = [0x8b, 0x5c, 0xf6];

pub const POSITION_UNIT: &str = "px";

pub fn parameter_color(parameter: Parameter) -> [u8; 3] {
    match parameter {
        Parameter::Amplitude => AMPLITUDE_COLOR,
        Parameter::Frequency => FREQUENCY_COLOR,
        Parameter::Phase => PHASE_COLOR,
    }
}

pub fn equation_symbolic() -> &'static str {
    "x(t) = A·cos(2π·f·t + φ)"
}

pub fn equation_numeric(params: &SimulationParameters) -> String {
    format!(
        "x(t) = {}·cos(2π·{}·t {} {})",
        format_value(Parameter::Amplitude, params.amplitude),
        format_value(Parameter::Frequency, params.frequency),
        if params.phase < 0.0 { '-' } else { '+' },
        format_value(Parameter::Phase, params.phase.abs()),
    )
}

pub fn format_value(parameter: Parameter, value: f64) -> String {
    format!("{:.*}", parameter.precision(), value)
}

/// Slider caption, e.g. `Frequency f (Hz): 0.50`.
pub fn parameter_caption(parameter: Parameter, value: f64) -> String {
    format!("{}: {}", parameter.label(), format_value(parameter, value))
}

pub fn format_tooltip(x: f64) -> String {
    format!("{x:.1} {POSITION_UNIT}")
}

/// Fixed axes for the waveform chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub t_min: f64,
    pub t_max: f64,
    pub x_min: f64,
    pub x_max: f64,
}

impl ChartBounds {
    pub fn for_window(window: &WaveformWindow) -> Self {
        Self {
            t_min: 0.0,
            t_max: window.total_t,
            x_min: -AMPLITUDE_RANGE.max,
            x_max: AMPLITUDE_RANGE.max,
        }
    }
}

impl Default for ChartBounds {
    fn default() -> Self {
        Self::for_window(&WaveformWindow::default())
    }
}
