//! Network-loading error type.

use thiserror::Error;

use nf_core::NfError;

/// Errors produced while reading network tables.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("column `{0}` not found in table header")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },

    #[error(transparent)]
    Core(#[from] NfError),
}

pub type NetResult<T> = Result<T, NetError>;
