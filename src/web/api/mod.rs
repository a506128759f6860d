pub mod error;
pub mod simulation;
