use thiserror::Error;

/// Domain-level errors for values that cannot be represented
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Unknown view: {0}")]
    UnknownView(String),
}
