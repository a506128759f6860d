use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropagationError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error(
        "numerical instability at t={time_s:.3}s with step {step_s}s \
         (energy drift {energy_drift:.3e}, angular momentum drift {momentum_drift:.3e})"
    )]
    NumericalInstability {
        step_s: f64,
        time_s: f64,
        energy_drift: f64,
        momentum_drift: f64,
    },
    #[error("propagation cancelled at t={time_s:.3}s")]
    Cancelled { time_s: f64 },
}

impl PropagationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PropagationError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}
