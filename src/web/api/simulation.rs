use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::RequestDefaults;
use crate::propagator::{CancelToken, SimulationRequest, Trajectory};
use crate::web::api::error::{ApiError, ApiResult, ErrorResponse};
use crate::web::server::AppState;

/// A numeric field that clients may send either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn value(&self, field: &str) -> Result<f64, ApiError> {
        match self {
            Scalar::Number(n) => Ok(*n),
            Scalar::Text(s) => s.trim().parse().map_err(|_| {
                ApiError::Validation(format!("invalid {field}: {s:?} is not a number"))
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SimulationParams {
    /// Initial altitude (km)
    #[serde(default)]
    pub altitude: Option<Scalar>,
    /// Initial tangential speed (m/s), 0 for circular
    #[serde(default)]
    pub velocity: Option<Scalar>,
    /// Simulated time span (s)
    #[serde(default)]
    pub duration: Option<Scalar>,
    /// Orbital plane tilt about +X (deg)
    #[serde(default)]
    pub inclination: Option<Scalar>,
}

impl SimulationParams {
    /// Parses a request body. An empty body means "all defaults".
    pub fn from_body(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|e| ApiError::Validation(format!("invalid JSON body: {e}")))
    }

    pub fn resolve(&self, defaults: &RequestDefaults) -> Result<SimulationRequest, ApiError> {
        let pick = |field: &str, scalar: &Option<Scalar>, default: f64| match scalar {
            Some(s) => s.value(field),
            None => Ok(default),
        };
        let altitude = pick("altitude", &self.altitude, defaults.altitude_km)?;
        let velocity = pick("velocity", &self.velocity, defaults.velocity_mps)?;
        let duration = pick("duration", &self.duration, defaults.duration_s)?;
        let inclination = pick("inclination", &self.inclination, defaults.inclination_deg)?;
        Ok(SimulationRequest::new(altitude, velocity, duration).with_inclination(inclination))
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TrajectoryData {
    pub time: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl From<&Trajectory> for TrajectoryData {
    fn from(trajectory: &Trajectory) -> Self {
        let n = trajectory.len();
        let mut data = TrajectoryData {
            time: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            z: Vec::with_capacity(n),
        };
        for s in trajectory.iter() {
            data.time.push(s.time_s);
            data.x.push(s.position.x);
            data.y.push(s.position.y);
            data.z.push(s.position.z);
        }
        data
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SimulationResponse {
    pub status: String,
    pub data: TrajectoryData,
    pub message: String,
}

#[utoipa::path(
    post,
    path = "/run-simulation",
    request_body(content = SimulationParams, content_type = "application/json"),
    responses(
        (status = 200, description = "Simulated trajectory", body = SimulationResponse),
        (status = 400, description = "Invalid parameters", body = ErrorResponse),
        (status = 422, description = "Integration did not conserve energy", body = ErrorResponse),
        (status = 500, description = "Simulation output unavailable", body = ErrorResponse),
        (status = 504, description = "Simulation timed out", body = ErrorResponse)
    ),
    tag = "simulation"
)]
pub async fn run_simulation(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SimulationResponse>> {
    let params = SimulationParams::from_body(&body)?;
    let request = params.resolve(&state.config.defaults)?;
    let timeout = state.config.web.timeout;

    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let propagator = state.propagator.clone();
    let task = tokio::task::spawn_blocking(move || {
        propagator.propagate_with_cancel(&request, &worker_cancel)
    });

    let trajectory = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result?,
        Ok(Err(join_err)) => {
            log::error!("simulation worker failed: {}", join_err);
            return Err(ApiError::OutputUnavailable(join_err.to_string()));
        }
        Err(_) => {
            cancel.cancel();
            log::warn!("simulation {:?} cancelled after {:?}", request, timeout);
            return Err(ApiError::Timeout(timeout));
        }
    };

    log::info!(
        "simulated {:?}: {} samples, step {}s",
        request,
        trajectory.len(),
        trajectory.step_s
    );

    Ok(Json(SimulationResponse {
        status: "success".to_string(),
        data: TrajectoryData::from(&trajectory),
        message: trajectory.summary(),
    }))
}
