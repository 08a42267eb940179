use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Inclusive bounds and slider step of one simulation parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl ParamRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamps `value` into the range. Returns `None` for NaN, which has no
    /// meaningful nearest bound.
    pub fn clamp(&self, value: f64) -> Option<f64> {
        if value.is_nan() {
            None
        } else {
            Some(value.clamp(self.min, self.max))
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const AMPLITUDE_RANGE: ParamRange = ParamRange::new(20.0, 200.0, 1.0);
pub const FREQUENCY_RANGE: ParamRange = ParamRange::new(0.1, 2.0, 0.01);
pub const PHASE_RANGE: ParamRange = ParamRange::new(-PI, PI, 0.01);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Amplitude,
    Frequency,
    Phase,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Amplitude, Parameter::Frequency, Parameter::Phase];

    pub fn range(self) -> ParamRange {
        match self {
            Parameter::Amplitude => AMPLITUDE_RANGE,
            Parameter::Frequency => FREQUENCY_RANGE,
            Parameter::Phase => PHASE_RANGE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Parameter::Amplitude => "Amplitude A (px)",
            Parameter::Frequency => "Frequency f (Hz)",
            Parameter::Phase => "Initial phase φ (rad)",
        }
    }

    pub fn precision(self) -> usize {
        match self {
            Parameter::Amplitude => 0,
            Parameter::Frequency | Parameter::Phase => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterUpdate {
    pub parameter: Parameter,
    pub value: f64,
}

impl ParameterUpdate {
    pub fn new(parameter: Parameter, value: f64) -> Self {
        Self { parameter, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    pub amplitude: f64,
    pub frequency: f64,
    pub phase: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            amplitude: 120.0,
            frequency: 0.5,
            phase: 0.0,
        }
    }
}

impl SimulationParameters {
    /// Builds parameters from raw values, clamping each into its range.
    /// NaN falls back to the default for that field.
    pub fn clamped(amplitude: f64, frequency: f64, phase: f64) -> Self {
        Self::default()
            .with_amplitude(amplitude)
            .with_frequency(frequency)
            .with_phase(phase)
    }

    pub fn with_amplitude(self, amplitude: f64) -> Self {
        self.with(ParameterUpdate::new(Parameter::Amplitude, amplitude))
    }

    pub fn with_frequency(self, frequency: f64) -> Self {
        self.with(ParameterUpdate::new(Parameter::Frequency, frequency))
    }

    pub fn with_phase(self, phase: f64) -> Self {
        self.with(ParameterUpdate::new(Parameter::Phase, phase))
    }

    /// Applies one control event. Out-of-range values are clamped silently;
    /// NaN leaves the parameter untouched.
    pub fn with(mut self, update: ParameterUpdate) -> Self {
        let Some(value) = update.parameter.range().clamp(update.value) else {
            return self;
        };
        *self.field_mut(update.parameter) = value;
        self
    }

    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Amplitude => self.amplitude,
            Parameter::Frequency => self.frequency,
            Parameter::Phase => self.phase,
        }
    }

    /// Re-clamps every field. Used on values that did not come through a
    /// setter, e.g. deserialized presets.
    pub fn sanitized(self) -> Self {
        Parameter::ALL.iter().fold(Self::default(), |acc, &parameter| {
            acc.with(ParameterUpdate::new(parameter, self.get(parameter)))
        })
    }

    pub fn is_valid(&self) -> bool {
        Parameter::ALL
            .iter()
            .all(|&parameter| parameter.range().contains(self.get(parameter)))
    }

    fn field_mut(&mut self, parameter: Parameter) -> &mut f64 {
        match parameter {
            Parameter::Amplitude => &mut self.amplitude,
            Parameter::Frequency => &mut self.frequency,
            Parameter::Phase => &mut self.phase,
        }
    }
}

/// Holds the live parameters. `revision` advances only when a stored value
/// actually changes, so consumers can tell a no-op slider event apart from
/// a real edit.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    current: SimulationParameters,
    revision: u64,
}

impl ParameterStore {
    pub fn new(initial: SimulationParameters) -> Self {
        Self {
            current: initial.sanitized(),
            revision: 0,
        }
    }

    pub fn get(&self) -> SimulationParameters {
        self.current
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn apply(&mut self, update: ParameterUpdate) -> bool {
        let next = self.current.with(update);
        self.replace(next)
    }

    pub fn set_amplitude(&mut self, amplitude: f64) -> bool {
        self.apply(ParameterUpdate::new(Parameter::Amplitude, amplitude))
    }

    pub fn set_frequency(&mut self, frequency: f64) -> bool {
        self.apply(ParameterUpdate::new(Parameter::Frequency, frequency))
    }

    pub fn set_phase(&mut self, phase: f64) -> bool {
        self.apply(ParameterUpdate::new(Parameter::Phase, phase))
    }

    /// Swaps in a whole parameter set, e.g. from a preset. Each field goes
    /// through the same clamping as a single update, so a NaN field keeps
    /// the stored value.
    pub fn replace(&mut self, params: SimulationParameters) -> bool {
        let next = Parameter::ALL.iter().fold(self.current, |acc, &parameter| {
            acc.with(ParameterUpdate::new(parameter, params.get(parameter)))
        });
        if next == self.current {
            return false;
        }
        tracing::debug!(
            amplitude = next.amplitude,
            frequency = next.frequency,
            phase = next.phase,
            "simulation parameters changed"
        );
        self.current = next;
        self.revision += 1;
        true
    }
}
