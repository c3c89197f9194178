use thiserror::Error;

#[derive(Error, Debug)]
/// Error raised while reading or writing a table.
pub enum TableError {
    /// Failure to open, read or write the underlying byte resource.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON text, or a failure while encoding a value.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The decoded document did not have the expected shape.
    #[error("unexpected shape: {0}")]
    Shape(String),
}
