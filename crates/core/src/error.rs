use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("support card {0} not found in snapshot")]
    NotFound(u32),
    #[error("invalid condition atom '{atom}' in '{condition}'")]
    Parse { atom: String, condition: String },
    #[error("invalid numeric value '{0}'")]
    InvalidValue(String),
}

pub type EvalResult<T> = Result<T, EvalError>;
