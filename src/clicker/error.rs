use thiserror::Error;

use super::state::Track;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("not enough points: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },
    #[error("{track:?} is already at the highest level")]
    LevelMaxed { track: Track },
    #[error("reborn count is already at its maximum")]
    RebornMaxed,
}
