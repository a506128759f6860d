use serde::Deserialize;

use super::error::PropagationError;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropagatorSettings {
    /// Upper bound on the integration step (s).
    pub step_s: f64,
    /// Relative drift allowed on specific energy and angular momentum.
    pub tolerance: f64,
    /// Step halvings attempted after a failed conservation check.
    pub max_refinements: u32,
    /// The step never exceeds `sqrt(r0^3 / mu) / min_steps_per_radian`.
    pub min_steps_per_radian: f64,
    pub max_samples: usize,
    /// Steps between two polls of the cancellation token.
    pub cancel_check_interval: usize,
}

impl Default for PropagatorSettings {
    fn default() -> Self {
        Self {
            step_s: 1.0,
            tolerance: 1e-6,
            max_refinements: 2,
            min_steps_per_radian: 100.0,
            max_samples: 5_000_000,
            cancel_check_interval: 1024,
        }
    }
}

impl PropagatorSettings {
    pub fn validate(&self) -> Result<(), PropagationError> {
        if !(self.step_s.is_finite() && self.step_s > 0.0) {
            return Err(PropagationError::invalid("step_s", "must be a positive number"));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(PropagationError::invalid("tolerance", "must be a positive number"));
        }
        if !(self.min_steps_per_radian.is_finite() && self.min_steps_per_radian > 0.0) {
            return Err(PropagationError::invalid(
                "min_steps_per_radian",
                "must be a positive number",
            ));
        }
        if self.max_samples == 0 {
            return Err(PropagationError::invalid("max_samples", "must be non-zero"));
        }
        Ok(())
    }
}
