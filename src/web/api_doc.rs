use utoipa::OpenApi;

use super::api::error::ErrorResponse;
use super::api::simulation::{Scalar, SimulationParams, SimulationResponse, TrajectoryData};

#[derive(OpenApi)]
#[openapi(
    paths(super::api::simulation::run_simulation),
    components(schemas(
        SimulationParams,
        Scalar,
        SimulationResponse,
        TrajectoryData,
        ErrorResponse,
    )),
    info(
        title = "Orbit Sim API",
        description = "Two-body orbit propagation",
        version = "0.1.0"
    ),
    tags(
        (name = "simulation", description = "Trajectory propagation")
    )
)]
pub struct ApiDoc;
