use thiserror::Error;

use crate::{db::traits::StorageError, order_lifecycle::LifecycleError};

/// The error taxonomy shared by all the marketplace APIs.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
}

impl From<LifecycleError> for MarketError {
    fn from(e: LifecycleError) -> Self {
        match e {
            LifecycleError::NotParticipant | LifecycleError::FreelancerOnly(_) => Self::Forbidden(e.to_string()),
            LifecycleError::NotPending(_) => Self::InvalidState(e.to_string()),
        }
    }
}
