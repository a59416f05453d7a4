use thiserror::Error;

#[derive(Error, Debug)]
pub enum BikeshareError {
    #[error("City catalog mismatch: expected {expected:?}, found {found:?}")]
    CityCatalogMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("No data source registered for city: {0}")]
    UnknownCity(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input stream closed before an answer was given")]
    InputClosed,
}

pub type Result<T> = std::result::Result<T, BikeshareError>;
