use approx::assert_relative_eq;
use orbit_sim::propagator::{circular_speed, initial_state, EARTH_RADIUS_M};
use orbit_sim::{PropagationError, Propagator, PropagatorSettings, SimulationRequest};

const TOLERANCE: f64 = 1e-6;

fn propagate(altitude_km: f64, speed_mps: f64, duration_s: f64) -> orbit_sim::Trajectory {
    Propagator::default()
        .propagate(&SimulationRequest::new(altitude_km, speed_mps, duration_s))
        .expect("valid request should propagate")
}

#[test]
fn first_sample_is_the_initial_state() {
    for request in [
        SimulationRequest::new(400.0, 0.0, 100.0),
        SimulationRequest::new(800.0, 7600.0, 100.0),
        SimulationRequest::new(400.0, 7669.0, 100.0).with_inclination(51.6),
    ] {
        let trajectory = Propagator::default().propagate(&request).unwrap();
        let first = trajectory.first().unwrap();
        assert_eq!(first.time_s, 0.0);
        assert_eq!(*first, initial_state(&request).unwrap());
    }
}

#[test]
fn auto_speed_orbit_is_circular() {
    let trajectory = propagate(400.0, 0.0, 7000.0);
    let expected = EARTH_RADIUS_M + 400_000.0;

    for state in trajectory.iter() {
        assert_relative_eq!(state.radius(), expected, max_relative = TOLERANCE);
    }
    assert_relative_eq!(
        trajectory.first().unwrap().speed(),
        circular_speed(expected),
        max_relative = 1e-12
    );
}

#[test]
fn energy_and_angular_momentum_are_conserved() {
    for (altitude, speed, duration) in [
        (400.0, 0.0, 7000.0),
        (400.0, 7669.0, 5500.0),
        (400.0, 8500.0, 20_000.0),
        (400.0, 11_500.0, 5000.0),
        (2000.0, -6500.0, 10_000.0),
    ] {
        let trajectory = propagate(altitude, speed, duration);
        let first = trajectory.first().unwrap();
        let energy0 = first.specific_energy();
        let momentum0 = first.angular_momentum();
        let energy_scale = energy0.abs().max(0.5 * first.speed().powi(2));

        for state in trajectory.iter() {
            assert!((state.specific_energy() - energy0).abs() / energy_scale <= TOLERANCE);
            assert!((state.angular_momentum() - momentum0).abs() / momentum0 <= TOLERANCE);
        }
        assert!(trajectory.max_energy_drift <= TOLERANCE);
        assert!(trajectory.max_momentum_drift <= TOLERANCE);
    }
}

#[test]
fn identical_requests_give_identical_trajectories() {
    let a = propagate(550.0, 7500.0, 3000.0);
    let b = propagate(550.0, 7500.0, 3000.0);
    assert_eq!(a, b);
}

#[test]
fn samples_are_uniformly_spaced() {
    let trajectory = propagate(400.0, 0.0, 7000.0);
    let times: Vec<f64> = trajectory.iter().map(|s| s.time_s).collect();

    for pair in times.windows(2) {
        assert_relative_eq!(pair[1] - pair[0], trajectory.step_s, max_relative = 1e-9);
    }
}

#[test]
fn last_sample_never_passes_duration() {
    for duration in [0.3, 10.7, 999.999, 7000.0] {
        let trajectory = propagate(400.0, 0.0, duration);
        assert!(trajectory.span_s() <= duration);
        assert!(duration - trajectory.span_s() < trajectory.step_s);
    }
}

#[test]
fn duration_shorter_than_one_step_keeps_initial_sample() {
    let trajectory = propagate(400.0, 0.0, 0.5);
    assert_eq!(trajectory.len(), 1);
    assert_eq!(trajectory.first().unwrap().time_s, 0.0);
}

#[test]
fn altitude_just_above_surface_succeeds() {
    let trajectory = propagate(1e-6, 0.0, 100.0);
    assert_eq!(trajectory.len(), 101);
    assert!(trajectory.first().unwrap().radius() > EARTH_RADIUS_M);
}

#[test]
fn non_positive_altitude_is_invalid_input() {
    for altitude in [0.0, -10.0] {
        let err = Propagator::default()
            .propagate(&SimulationRequest::new(altitude, 0.0, 7000.0))
            .unwrap_err();
        assert!(matches!(
            err,
            PropagationError::InvalidInput {
                field: "altitude",
                ..
            }
        ));
    }
}

#[test]
fn non_positive_duration_is_invalid_input() {
    let err = Propagator::default()
        .propagate(&SimulationRequest::new(400.0, 0.0, 0.0))
        .unwrap_err();
    assert!(matches!(
        err,
        PropagationError::InvalidInput {
            field: "duration",
            ..
        }
    ));
}

#[test]
fn default_scenario_stays_near_400_km() {
    let trajectory = propagate(400.0, 0.0, 7000.0);

    assert_eq!(trajectory.len(), 7001);
    assert_relative_eq!(trajectory.span_s(), 7000.0);
    for state in trajectory.iter() {
        let altitude_km = (state.radius() - EARTH_RADIUS_M) / 1000.0;
        assert_relative_eq!(altitude_km, 400.0, epsilon = 0.01);
    }
}

#[test]
fn one_period_orbit_closes() {
    let trajectory = propagate(400.0, 7669.0, 5500.0);
    let first = trajectory.first().unwrap();
    let last = trajectory.last().unwrap();

    let gap = (last.position - first.position).norm();
    assert!(
        gap < 0.1 * first.radius(),
        "gap {gap} m is too large for a closed orbit"
    );
}

#[test]
fn coarse_step_without_enough_refinements_fails_closed() {
    // 300 s and 150 s steps both drift past tolerance at periapsis.
    let settings = PropagatorSettings {
        step_s: 300.0,
        min_steps_per_radian: 1.0,
        max_refinements: 1,
        ..PropagatorSettings::default()
    };
    let err = Propagator::new(settings)
        .propagate(&SimulationRequest::new(400.0, 9000.0, 20_000.0))
        .unwrap_err();
    assert!(matches!(err, PropagationError::NumericalInstability { .. }));
}

#[test]
fn orbit_through_the_earth_is_invalid_input() {
    for speed in [10.0, 7000.0, -7000.0] {
        let err = Propagator::default()
            .propagate(&SimulationRequest::new(400.0, speed, 2000.0))
            .unwrap_err();
        assert!(matches!(
            err,
            PropagationError::InvalidInput {
                field: "velocity",
                ..
            }
        ));
    }
}

#[test]
fn low_periapsis_above_the_surface_propagates() {
    let trajectory = propagate(400.0, 7600.0, 6000.0);
    let lowest = trajectory
        .iter()
        .map(|s| s.radius())
        .fold(f64::INFINITY, f64::min);
    assert!(lowest > EARTH_RADIUS_M);
    assert!(lowest < EARTH_RADIUS_M + 400_000.0);
}

#[test]
fn refinement_recovers_from_coarse_step() {
    // 300 s steps drift past tolerance at periapsis; 75 s steps do not.
    let settings = PropagatorSettings {
        step_s: 300.0,
        min_steps_per_radian: 1.0,
        tolerance: 1e-6,
        max_refinements: 4,
        ..PropagatorSettings::default()
    };
    let trajectory = Propagator::new(settings)
        .propagate(&SimulationRequest::new(400.0, 9000.0, 20_000.0))
        .unwrap();
    assert!(trajectory.refinements > 0);
    assert!(trajectory.step_s <= 75.0);
    assert!(trajectory.max_energy_drift <= 1e-6);
}

#[test]
fn oversized_runs_are_rejected_up_front() {
    let settings = PropagatorSettings {
        max_samples: 1000,
        ..PropagatorSettings::default()
    };
    let err = Propagator::new(settings)
        .propagate(&SimulationRequest::new(400.0, 0.0, 7000.0))
        .unwrap_err();
    assert!(matches!(
        err,
        PropagationError::InvalidInput {
            field: "duration",
            ..
        }
    ));
}

#[test]
fn parallel_runs_match_each_other() {
    let request = SimulationRequest::new(550.0, 7500.0, 3000.0);
    let propagator = Propagator::default();

    let (a, b) = std::thread::scope(|scope| {
        let a = scope.spawn(|| propagator.propagate(&request).unwrap());
        let b = scope.spawn(|| propagator.propagate(&request).unwrap());
        (a.join().unwrap(), b.join().unwrap())
    });
    assert_eq!(a, b);
    assert_eq!(a, propagator.propagate(&request).unwrap());
}
