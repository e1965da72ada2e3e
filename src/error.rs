use std::fmt;

#[derive(Debug)]
pub enum VarError {
    ConfigError(String),
    RequestError(String),
    TimeoutError(String),
    UnavailableError(String),
    ServiceError(String),
    ResponseError(String),
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            VarError::RequestError(msg) => write!(f, "Request error: {}", msg),
            VarError::TimeoutError(msg) => write!(f, "Timeout error: {}", msg),
            VarError::UnavailableError(msg) => write!(f, "Service unavailable: {}", msg),
            VarError::ServiceError(msg) => write!(f, "Service error: {}", msg),
            VarError::ResponseError(msg) => write!(f, "Response error: {}", msg),
        }
    }
}

impl std::error::Error for VarError {}

pub type Result<T> = std::result::Result<T, VarError>;
