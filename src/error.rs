use thiserror::Error;

use crate::components::GridPosition;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("invalid footprint for {building}: {reason}")]
    InvalidFootprint { building: String, reason: String },

    #[error("invalid connection {from} -> {to}: {reason}")]
    InvalidConnection {
        from: GridPosition,
        to: GridPosition,
        reason: &'static str,
    },

    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed grid key `{0}`")]
pub struct GridKeyError(pub String);
