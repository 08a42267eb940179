pub mod clock;
pub mod config;
pub mod display;
pub mod motion;
pub mod params;
pub mod sampler;
pub mod simulation;

pub use clock::{
    CancelToken, Frame, FrameScheduler, IntervalScheduler, ManualTimeSource, MonotonicTimeSource,
    SimulationClock, SteppedScheduler, TimeSource,
};
pub use config::{default_presets, load_config, load_preset, save_config, save_preset, Preset, SimulationConfig};
pub use display::{equation_numeric, equation_symbolic, format_tooltip, ChartBounds};
pub use motion::{displacement, position};
pub use params::{Parameter, ParameterStore, ParameterUpdate, ParamRange, SimulationParameters};
pub use sampler::{generate_waveform, samples, Sampler, Samples, WaveformSample, WaveformWindow};
pub use simulation::Simulation;
