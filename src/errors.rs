use thiserror::Error;

#[derive(Error, Debug)]
pub enum FineError {
    #[error("invalid amount: {value}")]
    InvalidAmount {
        value: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid payed state transition: {from} -> {to}")]
    InvalidStateTransition {
        from: String,
        to: String,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid fine number: {number}, must be at least 1")]
    InvalidFineNumber {
        number: u32,
    },

    #[error("invalid payed state: {message}")]
    InvalidPayedState {
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FineError {
    pub(crate) fn invalid_amount(value: impl ToString) -> Self {
        FineError::InvalidAmount {
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FineError>;
