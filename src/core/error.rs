use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    #[error("Change tracking was never activated for '{0}'")]
    NotTracked(&'static str),

    #[error("Expected a tracked collection {expected}, received {received}")]
    NotTrackedCollection {
        expected: &'static str,
        received: &'static str,
    },

    #[error("Invalid tracking configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;
