//! Errors raised while constructing protocol types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypesError {
    #[error("invalid juror address: {0}")]
    InvalidAddress(String),

    #[error("invalid commitment hash: {0}")]
    InvalidHash(String),

    #[error("unknown commit scheme: {0}")]
    UnknownScheme(String),
}
