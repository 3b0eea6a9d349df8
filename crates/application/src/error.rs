use domain::{DomainError, RepositoryError};
use thiserror::Error;

use crate::live_client::LiveClientError;
use crate::processor::ProcessorError;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("repository error: {0}")]
    Repository(RepositoryError),
    #[error("live client error: {0}")]
    LiveClient(#[from] LiveClientError),
    #[error("processor error: {0}")]
    Processor(#[from] ProcessorError),
}

impl From<RepositoryError> for ApplicationError {
    fn from(value: RepositoryError) -> Self {
        ApplicationError::Repository(value)
    }
}

pub type ApplicationResult<T> = Result<T, ApplicationError>;
