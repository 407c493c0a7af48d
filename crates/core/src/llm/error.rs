use crate::llm::Provider;
use std::fmt;

#[derive(Debug)]
pub enum LlmError {
    Config {
        provider: Provider,
        detail: String,
    },
    Transport {
        provider: Provider,
        source: reqwest::Error,
    },
    Http {
        provider: Provider,
        status: u16,
        body: String,
    },
    Decode {
        provider: Provider,
        detail: String,
    },
    /// The call succeeded but the content was blank.
    EmptyResponse { provider: Provider },
}

impl LlmError {
    pub fn provider(&self) -> Provider {
        match self {
            LlmError::Config { provider, .. }
            | LlmError::Transport { provider, .. }
            | LlmError::Http { provider, .. }
            | LlmError::Decode { provider, .. }
            | LlmError::EmptyResponse { provider } => *provider,
        }
    }

    pub fn stage(&self) -> &'static str {
        match self {
            LlmError::Config { .. } => "config",
            LlmError::Transport { .. } => "transport",
            LlmError::Http { .. } => "http",
            LlmError::Decode { .. } => "decode",
            LlmError::EmptyResponse { .. } => "empty_response",
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LLM error (provider={:?}, stage={}): ",
            self.provider(),
            self.stage()
        )?;
        match self {
            LlmError::Config { detail, .. } | LlmError::Decode { detail, .. } => {
                f.write_str(detail)
            }
            LlmError::Transport { source, .. } => write!(f, "{source}"),
            LlmError::Http { status, body, .. } => write!(f, "status={status} body={body}"),
            LlmError::EmptyResponse { .. } => f.write_str("completion content was empty"),
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LlmError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}
