use approx::{assert_abs_diff_eq, assert_relative_eq};
use shmlab_core::motion::{angular_frequency, period, velocity};
use shmlab_core::{displacement, position, SimulationParameters};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

#[test]
fn default_parameters_reach_negative_peak_after_one_second() {
    let params = SimulationParameters::default();
    assert_relative_eq!(position(&params, 0.0), 120.0, epsilon = 1e-9);
    assert_relative_eq!(position(&params, 1.0), -120.0, epsilon = 1e-9);
    assert_relative_eq!(position(&params, 2.0), 120.0, epsilon = 1e-9);
}

#[test]
fn quarter_phase_starts_at_equilibrium() {
    let params = SimulationParameters::default().with_phase(FRAC_PI_2);
    assert_abs_diff_eq!(position(&params, 0.0), 0.0, epsilon = 1e-9);
}

#[test]
fn max_frequency_half_cycle_at_quarter_second() {
    for amplitude in [20.0, 75.5, 200.0] {
        let params = SimulationParameters::clamped(amplitude, 2.0, 0.0);
        assert_relative_eq!(position(&params, 0.25), -amplitude, epsilon = 1e-9);
    }
}

#[test]
fn matches_closed_form_across_parameter_grid() {
    for &amplitude in &[20.0, 120.0, 200.0] {
        for &frequency in &[0.1, 0.5, 1.37, 2.0] {
            for &phase in &[-PI, -1.0, 0.0, 2.5, PI] {
                let params = SimulationParameters::clamped(amplitude, frequency, phase);
                for step in 0..50 {
                    let t = step as f64 * 0.173;
                    let expected = amplitude * (TAU * frequency * t + phase).cos();
                    assert_abs_diff_eq!(position(&params, t), expected, epsilon = 1e-9);
                    assert_abs_diff_eq!(
                        displacement(amplitude, frequency, phase, t),
                        expected,
                        epsilon = 1e-9
                    );
                }
            }
        }
    }
}

#[test]
fn position_is_bounded_by_amplitude() {
    let params = SimulationParameters::clamped(87.0, 1.3, 0.4);
    for step in 0..1000 {
        let x = position(&params, step as f64 * 0.011);
        assert!(x.abs() <= params.amplitude + 1e-9, "{x} exceeds amplitude");
    }
}

#[test]
fn velocity_and_period_follow_frequency() {
    let params = SimulationParameters::default();
    assert_relative_eq!(angular_frequency(0.5), PI, epsilon = 1e-12);
    assert_relative_eq!(period(&params), 2.0, epsilon = 1e-12);
    assert_abs_diff_eq!(velocity(&params, 0.0), 0.0, epsilon = 1e-9);
    assert_relative_eq!(velocity(&params, 0.5), -120.0 * PI, epsilon = 1e-9);
}
