// src/client/error.rs

use std::fmt;

#[derive(Debug)]
pub enum ResolveError {
    /// No candidate answered successfully. Lists every URL tried, in order.
    Exhausted {
        resource: String,
        attempted: Vec<String>,
    },

    /// A server answered, but not with the shape we expected.
    Decode(String),

    /// The HTTP client itself could not be built.
    Client(reqwest::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::Exhausted {
                resource,
                attempted,
            } => write!(
                f,
                "could not reach {} on any server; tried: {}",
                resource,
                attempted.join(", ")
            ),
            ResolveError::Decode(msg) => write!(f, "unexpected response: {}", msg),
            ResolveError::Client(err) => write!(f, "http client error: {}", err),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        ResolveError::Client(err)
    }
}
