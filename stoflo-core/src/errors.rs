use crate::flow::RateError;
use crate::time_grid::Time;
use thiserror::Error;

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum StofloError {
    /// A flow or driver links to a stock that was never added to the model.
    #[error("'{source_name}' references unknown stock '{stock}'")]
    UnknownStockReference { source_name: String, stock: String },
    /// A trajectory or driver series was indexed outside of its length.
    #[error("Index {index} is out of range for '{name}' with length {len}")]
    DimensionMismatch {
        name: String,
        index: usize,
        len: usize,
    },
    /// A caller supplied rate function returned an error.
    #[error("Rate function for flow '{flow}' failed at t={time}: {source}")]
    RateFunctionFailure {
        flow: String,
        time: Time,
        #[source]
        source: RateError,
    },
    #[error("No stock named '{0}'")]
    UnknownStock(String),
    #[error("Invalid time grid: {0}")]
    InvalidTimeGrid(String),
    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience type for `Result<T, StofloError>`.
pub type StofloResult<T> = Result<T, StofloError>;
