use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    ScheduleError(#[from] rollcall_schedule::error::ScheduleError),

    #[error(transparent)]
    CoreError(#[from] rollcall_core::error::CoreError),

    #[error("Conflict: {0}")]
    Conflict(#[from] rollcall_schedule::error::ConflictError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
