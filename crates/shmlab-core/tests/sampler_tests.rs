use approx::assert_abs_diff_eq;
use shmlab_core::sampler::MAX_SAMPLES;
use shmlab_core::{generate_waveform, position, samples, Sampler, SimulationParameters, WaveformWindow};
use std::sync::Arc;

#[test]
fn default_window_yields_401_rounded_ascending_samples() {
    let table = generate_waveform(&SimulationParameters::default(), &WaveformWindow::default());
    assert_eq!(table.len(), 401);
    assert_eq!(table[0].t, 0.0);
    assert_eq!(table[400].t, 8.0);
    for pair in table.windows(2) {
        assert!(pair[0].t < pair[1].t, "{} !< {}", pair[0].t, pair[1].t);
    }
    for sample in table.iter() {
        assert_eq!((sample.t * 100.0).round() / 100.0, sample.t);
    }
    assert_eq!(table[1].t, 0.02);
    assert_eq!(table[50].t, 1.0);
}

#[test]
fn samples_use_current_parameters() {
    let params = SimulationParameters::clamped(75.0, 1.25, -0.6);
    let window = WaveformWindow::default();
    for (i, sample) in generate_waveform(&params, &window).iter().enumerate() {
        assert_abs_diff_eq!(sample.x, position(&params, i as f64 * window.dt), epsilon = 1e-9);
    }
}

#[test]
fn regeneration_is_deterministic() {
    let params = SimulationParameters::clamped(33.0, 0.77, 1.1);
    let window = WaveformWindow::default();
    assert_eq!(generate_waveform(&params, &window), generate_waveform(&params, &window));
}

#[test]
fn lazy_sequence_is_sized_and_restartable() {
    let iter = samples(&SimulationParameters::default(), &WaveformWindow::default());
    assert_eq!(iter.len(), 401);
    let restart = iter.clone();
    let first: Vec<_> = iter.take(3).collect();
    let again: Vec<_> = restart.clone().take(3).collect();
    assert_eq!(first, again);
    assert_eq!(restart.rev().next().map(|s| s.t), Some(8.0));
}

#[test]
fn custom_window_stops_at_last_point_before_end() {
    let window = WaveformWindow {
        total_t: 1.05,
        dt: 0.1,
    };
    let table = generate_waveform(&SimulationParameters::default(), &window);
    assert_eq!(table.len(), 11);
    assert_eq!(table.last().map(|s| s.t), Some(1.0));
}

#[test]
fn sampler_reuses_table_until_parameters_change() {
    let mut sampler = Sampler::new(WaveformWindow::default());
    let params = SimulationParameters::default();
    let first = sampler.table(&params);
    let second = sampler.table(&params);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(sampler.regenerations(), 1);

    let changed = params.with_frequency(1.0);
    assert!(sampler.is_stale(&changed));
    let third = sampler.table(&changed);
    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(sampler.regenerations(), 2);

    sampler.invalidate();
    sampler.table(&changed);
    assert_eq!(sampler.regenerations(), 3);
}

#[test]
fn oversized_window_is_capped_instead_of_overflowing() {
    let huge = WaveformWindow {
        total_t: 1e300,
        dt: 1e-300,
    };
    assert!(!huge.fits_table());
    assert_eq!(huge.sample_count(), MAX_SAMPLES);

    let table = generate_waveform(&SimulationParameters::default(), &huge);
    assert_eq!(table.len(), MAX_SAMPLES);

    let infinite = WaveformWindow {
        total_t: f64::INFINITY,
        dt: 0.02,
    };
    assert_eq!(infinite.sample_count(), 1);
    assert!(WaveformWindow::default().fits_table());
}
