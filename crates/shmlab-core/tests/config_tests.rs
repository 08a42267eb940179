use shmlab_core::display::{parameter_caption, POSITION_UNIT};
use shmlab_core::{
    default_presets, equation_numeric, equation_symbolic, format_tooltip, generate_waveform, load_config,
    load_preset, save_preset, ChartBounds, ManualTimeSource, Parameter, Preset, Simulation,
    SimulationConfig, SimulationParameters, WaveformWindow,
};
use std::path::PathBuf;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("shmlab-{}-{name}", std::process::id()))
}

#[test]
fn preset_round_trips_through_json_file() {
    let path = temp_path("preset.json");
    let preset = Preset::new("Test", SimulationParameters::clamped(64.0, 1.5, -2.0));
    save_preset(&path, &preset).expect("save preset");
    let loaded = load_preset(&path).expect("load preset");
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, preset);
}

#[test]
fn loaded_config_is_clamped_and_defaulted() {
    let path = temp_path("config.json");
    std::fs::write(
        &path,
        r#"{ "parameters": { "amplitude": 500.0, "phase": -9.0 }, "window": { "dt": 0.0 }, "frame_rate_hz": -1 }"#,
    )
    .expect("write config");
    let config = load_config(&path).expect("load config");
    std::fs::remove_file(&path).ok();
    assert_eq!(config.parameters.amplitude, 200.0);
    assert_eq!(config.parameters.frequency, 0.5);
    assert_eq!(config.parameters.phase, -std::f64::consts::PI);
    assert_eq!(config.window, WaveformWindow::default());
    assert_eq!(config.frame_rate_hz, 60.0);
}

#[test]
fn missing_file_reports_path() {
    let path = temp_path("does-not-exist.json");
    let err = load_config(&path).expect_err("missing file");
    assert!(format!("{err:#}").contains("does-not-exist.json"));
}

#[test]
fn default_presets_are_valid() {
    let presets = default_presets();
    assert!(!presets.is_empty());
    assert_eq!(presets[0].config, SimulationConfig::default());
    assert!(presets.iter().all(|preset| preset.config.parameters.is_valid()));
}

#[test]
fn tooltip_uses_one_decimal_and_unit() {
    assert_eq!(format_tooltip(-120.0), "-120.0 px");
    assert_eq!(format_tooltip(3.14159), "3.1 px");
    assert_eq!(POSITION_UNIT, "px");
}

#[test]
fn equations_show_live_values() {
    assert_eq!(equation_symbolic(), "x(t) = A·cos(2π·f·t + φ)");
    assert_eq!(
        equation_numeric(&SimulationParameters::default()),
        "x(t) = 120·cos(2π·0.50·t + 0.00)"
    );
    let params = SimulationParameters::clamped(45.4, 1.234, -1.5);
    assert_eq!(equation_numeric(&params), "x(t) = 45·cos(2π·1.23·t - 1.50)");
}

#[test]
fn captions_and_chart_bounds() {
    assert_eq!(parameter_caption(Parameter::Frequency, 0.5), "Frequency f (Hz): 0.50");
    assert_eq!(parameter_caption(Parameter::Amplitude, 120.4), "Amplitude A (px): 120");
    let bounds = ChartBounds::default();
    assert_eq!((bounds.t_min, bounds.t_max), (0.0, 8.0));
    assert_eq!((bounds.x_min, bounds.x_max), (-200.0, 200.0));
}

#[test]
fn loaded_config_with_oversized_window_falls_back_to_default() {
    let path = temp_path("huge-window.json");
    std::fs::write(&path, r#"{"window":{"total_t":1e300,"dt":1e-300}}"#).expect("write config");
    let config = load_config(&path).expect("load config");
    std::fs::remove_file(&path).ok();

    assert_eq!(config.window, WaveformWindow::default());
    let table = generate_waveform(&config.parameters, &config.window);
    assert_eq!(table.len(), 401);
}

#[test]
fn preset_stops_matching_after_a_parameter_edit() {
    let preset = default_presets().remove(1);
    let mut simulation = Simulation::new(&preset.config, ManualTimeSource::new());
    assert!(preset.matches(&simulation.config()));

    assert!(simulation.set_amplitude(150.0));
    assert!(!preset.matches(&simulation.config()));
    let selected = default_presets()
        .iter()
        .position(|preset| preset.matches(&simulation.config()));
    assert_eq!(selected, None);

    assert!(simulation.set_amplitude(200.0));
    assert!(preset.matches(&simulation.config()));
}
