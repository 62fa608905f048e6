//! Error types for RaySonic

use crate::world::{ListenerId, SourceId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RaySonicError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Listener not found: {0}")]
    ListenerNotFound(ListenerId),

    #[error("Source not found: {0}")]
    SourceNotFound(SourceId),

    #[error("Invalid pose: {0}")]
    InvalidPose(String),
}

pub type Result<T> = std::result::Result<T, RaySonicError>;
