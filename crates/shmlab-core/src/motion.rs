use std::f64::consts::TAU;

use crate::params::SimulationParameters;

/// ω = 2πf, in rad/s.
pub fn angular_frequency(frequency_hz: f64) -> f64 {
    TAU * frequency_hz
}

/// x(t) = A·cos(2πf·t + φ). Total over all inputs; no integration state.
pub fn displacement(amplitude: f64, frequency_hz: f64, phase: f64, t: f64) -> f64 {
    amplitude * (angular_frequency(frequency_hz) * t + phase).cos()
}

pub fn position(params: &SimulationParameters, t: f64) -> f64 {
    displacement(params.amplitude, params.frequency, params.phase, t)
}

/// dx/dt at `t`. Not used by the renderers but handy for overlays and the CLI.
pub fn velocity(params: &SimulationParameters, t: f64) -> f64 {
    let omega = angular_frequency(params.frequency);
    -params.amplitude * omega * (omega * t + params.phase).sin()
}

pub fn period(params: &SimulationParameters) -> f64 {
    1.0 / params.frequency
}
