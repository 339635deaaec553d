use ordersys_events::DispatchError;

#[non_exhaustive]
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("dispatch: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("serialization: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("validation: {0}")]
    Validation(String),

    #[error("repository: {0}")]
    Repository(String),

    #[error("infra: {0}")]
    Infra(String),
}

pub type AppResult<T> = Result<T, AppError>;
