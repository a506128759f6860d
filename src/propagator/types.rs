use nalgebra::Vector3;
use serde::Serialize;

use super::constants::{EARTH_RADIUS_M, MU_EARTH};

/// Initial conditions for a single propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationRequest {
    pub altitude_km: f64,
    /// `0.0` selects the circular-orbit speed at the initial radius.
    /// Negative values fly retrograde.
    pub initial_speed_mps: f64,
    pub duration_s: f64,
    /// Tilt of the orbital plane about the +X axis.
    pub inclination_deg: f64,
}

impl SimulationRequest {
    pub fn new(altitude_km: f64, initial_speed_mps: f64, duration_s: f64) -> Self {
        Self {
            altitude_km,
            initial_speed_mps,
            duration_s,
            inclination_deg: 0.0,
        }
    }

    pub fn with_inclination(mut self, inclination_deg: f64) -> Self {
        self.inclination_deg = inclination_deg;
        self
    }

    pub fn is_auto_speed(&self) -> bool {
        self.initial_speed_mps == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateVector {
    pub time_s: f64,
    /// Earth-centered inertial position (m).
    pub position: Vector3<f64>,
    /// Earth-centered inertial velocity (m/s).
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(time_s: f64, position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self {
            time_s,
            position,
            velocity,
        }
    }

    pub fn radius(&self) -> f64 {
        self.position.norm()
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }

    /// Specific orbital energy (J/kg).
    pub fn specific_energy(&self) -> f64 {
        0.5 * self.velocity.norm_squared() - MU_EARTH / self.radius()
    }

    /// Magnitude of the specific angular momentum `|r x v|` (m^2/s).
    pub fn angular_momentum(&self) -> f64 {
        self.position.cross(&self.velocity).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().chain(self.velocity.iter()).all(|c| c.is_finite())
    }
}

/// Uniformly sampled propagation result. Sample `i` sits at `i * step_s`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub samples: Vec<StateVector>,
    pub step_s: f64,
    pub auto_speed: bool,
    /// How many times the step was halved before the run was accepted.
    pub refinements: u32,
    pub max_energy_drift: f64,
    pub max_momentum_drift: f64,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&StateVector> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&StateVector> {
        self.samples.last()
    }

    pub fn span_s(&self) -> f64 {
        self.last().map(|s| s.time_s).unwrap_or(0.0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StateVector> {
        self.samples.iter()
    }

    /// One-line run report, printed by the CLI and returned by the web API.
    pub fn summary(&self) -> String {
        let Some(first) = self.first() else {
            return "empty trajectory".to_string();
        };
        let mode = if self.auto_speed { "auto" } else { "manual" };
        format!(
            "initial altitude {:.3} km, {} speed {:.3} m/s; {} samples over {:.1} s \
             at {} s step (energy drift {:.2e}, angular momentum drift {:.2e})",
            (first.radius() - EARTH_RADIUS_M) / 1000.0,
            mode,
            first.speed(),
            self.len(),
            self.span_s(),
            self.step_s,
            self.max_energy_drift,
            self.max_momentum_drift,
        )
    }
}
