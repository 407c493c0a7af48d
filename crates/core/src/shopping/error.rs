use std::fmt;

#[derive(Debug)]
pub enum ShoppingError {
    /// Client id or secret missing.
    Config(String),
    Transport(reqwest::Error),
    Http { status: u16, body: String },
    Decode(String),
}

impl fmt::Display for ShoppingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShoppingError::Config(detail) => write!(f, "shopping search not configured: {detail}"),
            ShoppingError::Transport(err) => write!(f, "shopping search request failed: {err}"),
            ShoppingError::Http { status, body } => {
                write!(f, "shopping search HTTP {status}: {body}")
            }
            ShoppingError::Decode(detail) => {
                write!(f, "failed to decode shopping search response: {detail}")
            }
        }
    }
}

impl std::error::Error for ShoppingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShoppingError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
