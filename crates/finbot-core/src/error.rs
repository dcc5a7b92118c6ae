//! Error types for finbot

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transaction file not found: {0}")]
    NotFound(String),

    #[error("CSV missing required columns: {0}")]
    Schema(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
