use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("malformed record: {0}")]
    MalformedRecord(String),

    #[error("duplicate pin number: {0}")]
    DuplicateName(String),

    #[error("coordinate ({x}, {y}) exceeds the output grid range")]
    GeometryOverflow { x: i64, y: i64 },

    #[error("pin {0} has no resolved position or side")]
    UnresolvedPin(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("pins {first} and {second} occupy the same point")]
    PinCollision { first: String, second: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
