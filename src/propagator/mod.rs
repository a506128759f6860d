mod cancel;
mod constants;
mod error;
mod initial;
mod integrator;
mod propagate;
mod settings;
mod types;

pub use cancel::CancelToken;
pub use constants::{EARTH_RADIUS_M, MU_EARTH};
pub use error::PropagationError;
pub use initial::{
    circular_speed, initial_state, orbital_period, periapsis_radius, validate_request,
};
pub use integrator::{rk4_step, two_body_acceleration};
pub use propagate::{propagate, Propagator};
pub use settings::PropagatorSettings;
pub use types::{SimulationRequest, StateVector, Trajectory};
