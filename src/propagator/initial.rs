use nalgebra::Vector3;
use std::f64::consts::TAU;

use super::constants::{EARTH_RADIUS_M, MU_EARTH};
use super::error::PropagationError;
use super::types::{SimulationRequest, StateVector};

pub fn circular_speed(radius_m: f64) -> f64 {
    (MU_EARTH / radius_m).sqrt()
}

pub fn orbital_period(radius_m: f64) -> f64 {
    TAU * (radius_m.powi(3) / MU_EARTH).sqrt()
}

/// Closest approach to the Earth's center for a tangential start at
/// `radius_m`. The start is always an apsis; below circular speed it is the
/// apoapsis and periapsis lies half an orbit away.
pub fn periapsis_radius(radius_m: f64, speed_mps: f64) -> f64 {
    let v2 = speed_mps * speed_mps;
    if v2 >= MU_EARTH / radius_m {
        return radius_m;
    }
    radius_m * v2 / (2.0 * MU_EARTH / radius_m - v2)
}

pub fn validate_request(request: &SimulationRequest) -> Result<(), PropagationError> {
    let altitude = request.altitude_km;
    if !altitude.is_finite() {
        return Err(PropagationError::invalid("altitude", "must be a finite number"));
    }
    if altitude <= 0.0 {
        return Err(PropagationError::invalid(
            "altitude",
            format!("{altitude} km is not above the Earth's surface"),
        ));
    }
    // Tiny altitudes can round back onto the surface once converted to meters.
    if EARTH_RADIUS_M + altitude * 1000.0 <= EARTH_RADIUS_M {
        return Err(PropagationError::invalid(
            "altitude",
            format!("{altitude} km does not clear the Earth's radius"),
        ));
    }

    let duration = request.duration_s;
    if !(duration.is_finite() && duration > 0.0) {
        return Err(PropagationError::invalid(
            "duration",
            format!("{duration} s must be a positive number"),
        ));
    }
    if !request.initial_speed_mps.is_finite() {
        return Err(PropagationError::invalid("velocity", "must be a finite number"));
    }
    if !request.inclination_deg.is_finite() {
        return Err(PropagationError::invalid("inclination", "must be a finite number"));
    }

    let radius = EARTH_RADIUS_M + altitude * 1000.0;
    if !request.is_auto_speed() {
        let periapsis = periapsis_radius(radius, request.initial_speed_mps);
        if periapsis <= EARTH_RADIUS_M {
            return Err(PropagationError::invalid(
                "velocity",
                format!(
                    "{} m/s brings periapsis to {:.1} km, below the surface",
                    request.initial_speed_mps,
                    (periapsis - EARTH_RADIUS_M) / 1000.0
                ),
            ));
        }
    }
    Ok(())
}

/// State at `t = 0`: position on +X, velocity tangential in the plane tilted
/// by the inclination about +X.
pub fn initial_state(request: &SimulationRequest) -> Result<StateVector, PropagationError> {
    validate_request(request)?;

    let radius = EARTH_RADIUS_M + request.altitude_km * 1000.0;
    let speed = if request.is_auto_speed() {
        circular_speed(radius)
    } else {
        request.initial_speed_mps
    };

    let inclination = request.inclination_deg.to_radians();
    let position = Vector3::new(radius, 0.0, 0.0);
    let velocity = Vector3::new(0.0, inclination.cos(), inclination.sin()) * speed;

    Ok(StateVector::new(0.0, position, velocity))
}
