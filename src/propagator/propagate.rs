use super::cancel::CancelToken;
use super::constants::MU_EARTH;
use super::error::PropagationError;
use super::initial::initial_state;
use super::integrator::rk4_step;
use super::settings::PropagatorSettings;
use super::types::{SimulationRequest, StateVector, Trajectory};

#[derive(Debug, Clone, Default)]
pub struct Propagator {
    settings: PropagatorSettings,
}

impl Propagator {
    pub fn new(settings: PropagatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PropagatorSettings {
        &self.settings
    }

    pub fn propagate(&self, request: &SimulationRequest) -> Result<Trajectory, PropagationError> {
        propagate(request, &self.settings, &CancelToken::new())
    }

    pub fn propagate_with_cancel(
        &self,
        request: &SimulationRequest,
        cancel: &CancelToken,
    ) -> Result<Trajectory, PropagationError> {
        propagate(request, &self.settings, cancel)
    }
}

/// Integrates `request` into a uniformly sampled trajectory.
///
/// Manual speeds whose periapsis would fall inside the Earth are rejected up
/// front as [`PropagationError::InvalidInput`], so every emitted sample lies
/// above the surface.
///
/// Every step is checked against the conservation tolerance. A failed check
/// halves the step and restarts from `t = 0`, up to
/// `settings.max_refinements` times, after which the run fails with
/// [`PropagationError::NumericalInstability`]. No partial trajectory is
/// ever returned.
pub fn propagate(
    request: &SimulationRequest,
    settings: &PropagatorSettings,
    cancel: &CancelToken,
) -> Result<Trajectory, PropagationError> {
    settings.validate()?;
    let initial = initial_state(request)?;

    let time_scale = (initial.radius().powi(3) / MU_EARTH).sqrt();
    let mut step = settings.step_s.min(time_scale / settings.min_steps_per_radian);
    let mut steps = step_count(request.duration_s, step, settings.max_samples)?;
    let mut refinements = 0;

    log::debug!(
        "propagating {:?}: step {}s, {} steps, time scale {:.1}s",
        request,
        step,
        steps,
        time_scale
    );

    loop {
        match integrate(&initial, step, steps, settings, cancel) {
            Ok(run) => {
                return Ok(Trajectory {
                    samples: run.samples,
                    step_s: step,
                    auto_speed: request.is_auto_speed(),
                    refinements,
                    max_energy_drift: run.max_energy_drift,
                    max_momentum_drift: run.max_momentum_drift,
                });
            }
            Err(err @ PropagationError::NumericalInstability { .. }) => {
                let finer = step / 2.0;
                let retry = refinements < settings.max_refinements;
                match step_count(request.duration_s, finer, settings.max_samples) {
                    Ok(finer_steps) if retry => {
                        log::warn!("{}; retrying with step {}s", err, finer);
                        step = finer;
                        steps = finer_steps;
                        refinements += 1;
                    }
                    _ => return Err(err),
                }
            }
            Err(err) => return Err(err),
        }
    }
}

struct Run {
    samples: Vec<StateVector>,
    max_energy_drift: f64,
    max_momentum_drift: f64,
}

fn integrate(
    initial: &StateVector,
    step: f64,
    steps: usize,
    settings: &PropagatorSettings,
    cancel: &CancelToken,
) -> Result<Run, PropagationError> {
    if cancel.is_cancelled() {
        return Err(PropagationError::Cancelled { time_s: 0.0 });
    }

    let energy0 = initial.specific_energy();
    let energy_scale = energy0.abs().max(0.5 * initial.velocity.norm_squared());
    let momentum0 = initial.angular_momentum();
    let check_interval = settings.cancel_check_interval.max(1);

    let mut samples = Vec::with_capacity(steps + 1);
    samples.push(*initial);
    let mut state = *initial;
    let mut max_energy_drift = 0.0_f64;
    let mut max_momentum_drift = 0.0_f64;

    for i in 1..=steps {
        if i % check_interval == 0 && cancel.is_cancelled() {
            return Err(PropagationError::Cancelled {
                time_s: state.time_s,
            });
        }

        state = rk4_step(&state, step, i as f64 * step);

        let energy_drift = (state.specific_energy() - energy0).abs() / energy_scale;
        let momentum_drift = if momentum0 > 0.0 {
            (state.angular_momentum() - momentum0).abs() / momentum0
        } else {
            0.0
        };

        // NaN drifts fail the comparison as well.
        let conserved = energy_drift <= settings.tolerance && momentum_drift <= settings.tolerance;
        if !state.is_finite() || !conserved {
            return Err(PropagationError::NumericalInstability {
                step_s: step,
                time_s: state.time_s,
                energy_drift,
                momentum_drift,
            });
        }

        max_energy_drift = max_energy_drift.max(energy_drift);
        max_momentum_drift = max_momentum_drift.max(momentum_drift);
        samples.push(state);
    }

    Ok(Run {
        samples,
        max_energy_drift,
        max_momentum_drift,
    })
}

/// Completed steps that fit inside `duration`, so the last sample never
/// passes it.
fn step_count(duration: f64, step: f64, max_samples: usize) -> Result<usize, PropagationError> {
    let ratio = (duration / step).floor();
    if ratio + 1.0 > max_samples as f64 {
        return Err(PropagationError::invalid(
            "duration",
            format!("{duration} s at a {step} s step needs more than {max_samples} samples"),
        ));
    }

    let mut steps = ratio as usize;
    while steps > 0 && steps as f64 * step > duration {
        steps -= 1;
    }
    Ok(steps)
}
