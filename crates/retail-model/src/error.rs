use thiserror::Error;

#[derive(Debug, Error)]
pub enum RetailError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{entity}: required column '{column}' is missing")]
    MissingColumn { entity: String, column: String },
    #[error("unsupported file type: '{0}' is not a CSV or JSON object")]
    UnsupportedFormat(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, RetailError>;
