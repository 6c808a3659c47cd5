//! Top-level error type for parsing and decoding shared types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlackholeError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
