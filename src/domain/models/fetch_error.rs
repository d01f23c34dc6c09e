use thiserror::Error;

/// Outcome of a single failed request against the instrument server. A failed
/// cycle never touches what is already on screen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("unable to reach the server: {0}")]
    Network(String),

    #[error("server responded with HTTP {status}")]
    Http { status: u16 },

    #[error("unable to parse the log response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> FetchError {
        if let Some(status) = err.status() {
            return FetchError::Http {
                status: status.as_u16(),
            };
        }

        return FetchError::Network(err.to_string());
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> FetchError {
        return FetchError::Parse(err.to_string());
    }
}
