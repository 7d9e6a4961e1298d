use platform_api::ApiError;
use thiserror::Error;

use crate::store::StoreError;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("record not found")]
    NotFound,
    /// The record store could not answer. Callers may retry.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<StoreError> for HrError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(reason) => Self::Unavailable(reason),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(value: HrError) -> Self {
        match value {
            HrError::NotFound => ApiError::NotFound("record not found".into()),
            HrError::Unavailable(_) => ApiError::Unavailable,
            HrError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        }
    }
}
