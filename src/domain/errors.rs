use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The target URL could not be parsed, or is not http/https.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The configured proxy could not be parsed. Never carries the proxy string itself.
    #[error("Invalid proxy URL: {0}")]
    InvalidProxyUrl(String),

    /// Anything raised by the underlying HTTP client, untouched.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl FetchError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FetchError::Transport(Box::new(err))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
