use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("ClientError: {0}")]
    Client(#[source] reqwest::Error),
    #[error("TransportError: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("DecodeError: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("LookupError: {0}")]
    Other(String),
}

/// Terminal outcome of a failed resolution. Only the code crosses the HTTP
/// boundary; details stay in the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no usable reference supplied")]
    MissingInput,
    #[error("reference could not be matched to a facebook id")]
    NotFound,
    #[error("resolution failed")]
    ResolutionFailed,
}

impl ResolveError {
    pub fn code(&self) -> &'static str {
        use ResolveError::*;
        match self {
            MissingInput => "MISSING_INPUT",
            NotFound => "NOT_FOUND",
            ResolutionFailed => "RESOLUTION_FAILED",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("InvalidOverride: {key} maps to {value:?}, which is not a facebook id")]
    InvalidOverride { key: String, value: String },
}
