use thiserror::Error;

pub type Result<T> = std::result::Result<T, GsearchError>;

#[derive(Debug, Error)]
pub enum GsearchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for GsearchError {
    fn from(err: reqwest::Error) -> Self {
        GsearchError::Network(err.to_string())
    }
}
