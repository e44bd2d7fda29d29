//! Error types for the crate.
use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A vector handed to the network has the wrong width
    #[error("{what} has {actual} values, network expects {expected}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A feature or label field is not a number
    #[error("record {record}, field {field}: cannot parse {value:?} as a number")]
    Parse {
        record: usize,
        field: usize,
        value: String,
    },

    /// A label that is neither 0 nor 1
    #[error("record {record}: label {value} is not 0 or 1")]
    InvalidLabel { record: usize, value: i64 },

    /// A record too short to split into features and a label
    #[error("record {record} has {fields} field(s), need at least 2")]
    MalformedRecord { record: usize, fields: usize },

    /// Features or label read before the cursor was advanced onto a record
    #[error("data source is not positioned on a record")]
    NoCurrentRecord,

    /// Fewer records than a training session asked for
    #[error("data source exhausted after {available} of {requested} requested samples")]
    Exhausted { requested: usize, available: usize },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
