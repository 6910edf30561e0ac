use thiserror::Error;

pub type Result<T> = std::result::Result<T, CrunchbaseError>;

#[derive(Debug, Error)]
pub enum CrunchbaseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for CrunchbaseError {
    fn from(err: reqwest::Error) -> Self {
        CrunchbaseError::Network(err.to_string())
    }
}
