//! Fixed-step classical Runge-Kutta integration of the two-body problem.

use nalgebra::Vector3;

use super::constants::MU_EARTH;
use super::types::StateVector;

/// Point-mass gravitational acceleration at `position` (m/s^2).
pub fn two_body_acceleration(position: &Vector3<f64>) -> Vector3<f64> {
    let r = position.norm();
    -MU_EARTH * position / (r * r * r)
}

/// Advances `state` by `dt` seconds. The returned time is `time_s`, so callers
/// can derive it from the sample index and keep spacing exact.
pub fn rk4_step(state: &StateVector, dt: f64, time_s: f64) -> StateVector {
    let r0 = state.position;
    let v0 = state.velocity;
    let half = dt / 2.0;

    let (k1r, k1v) = (v0, two_body_acceleration(&r0));

    let r2 = r0 + k1r * half;
    let (k2r, k2v) = (v0 + k1v * half, two_body_acceleration(&r2));

    let r3 = r0 + k2r * half;
    let (k3r, k3v) = (v0 + k2v * half, two_body_acceleration(&r3));

    let r4 = r0 + k3r * dt;
    let (k4r, k4v) = (v0 + k3v * dt, two_body_acceleration(&r4));

    let position = r0 + (k1r + 2.0 * k2r + 2.0 * k3r + k4r) * (dt / 6.0);
    let velocity = v0 + (k1v + 2.0 * k2v + 2.0 * k3v + k4v) * (dt / 6.0);

    StateVector::new(time_s, position, velocity)
}
