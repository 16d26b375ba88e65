//! Remote config provider contract.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Raw remote values keyed by flag name, before coercion.
pub type RawFlagValues = BTreeMap<String, String>;

/// Why a remote fetch produced no values.
#[derive(Debug)]
pub enum FetchError {
    /// Project id or api key is missing or still a placeholder.
    NotConfigured,
    /// Transport-level failure, including timeouts.
    Http(reqwest::Error),
    /// Remote answered with a non-success status.
    Status { status: u16, body: String },
    /// Remote answered with a body that is not a fetch response.
    InvalidPayload(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "remote config is not configured"),
            Self::Http(err) => write!(f, "remote config request failed: {err}"),
            Self::Status { status, body } => {
                write!(f, "remote config request failed: HTTP {status} {body}")
            }
            Self::InvalidPayload(message) => {
                write!(f, "invalid remote config payload: {message}")
            }
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

/// Source of raw flag values. One call is one round trip (or cache hit).
pub trait RemoteConfigProvider {
    fn fetch(&mut self) -> Result<RawFlagValues, FetchError>;
}

impl<P: RemoteConfigProvider + ?Sized> RemoteConfigProvider for Box<P> {
    fn fetch(&mut self) -> Result<RawFlagValues, FetchError> {
        (**self).fetch()
    }
}
