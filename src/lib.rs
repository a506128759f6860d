//! Two-body orbit propagation with a text table wire format, an HTTP front
//! end and playback planning for trajectory animations.

pub mod config;
pub mod playback;
pub mod propagator;
pub mod table;
pub mod web;

pub use config::Config;
pub use propagator::{
    propagate, CancelToken, PropagationError, Propagator, PropagatorSettings, SimulationRequest,
    StateVector, Trajectory,
};
