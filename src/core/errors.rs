use thiserror::Error;

/// Failure taxonomy for API calls.
///
/// Exactly one variant is produced per failed call. The transport, HTTP and
/// exchange layers are kept distinct so callers can tell a broken network
/// from a rejected order from a malformed payload.
#[derive(Error, Debug)]
pub enum BinanceError {
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed response body: {body}")]
    Decode { body: String },

    #[error("exchange error {code}: {message}")]
    Exchange { code: i64, message: String },

    #[error("missing field `{0}` in response")]
    MissingField(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("configuration error: {0}")]
    Config(#[from] crate::core::config::ConfigError),

    #[error("{0}")]
    Other(String),
}

impl BinanceError {
    /// Exchange rejection code, if this is an in-band exchange error.
    pub fn exchange_code(&self) -> Option<i64> {
        match self {
            Self::Exchange { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// HTTP status code, if this is an HTTP-layer failure.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
