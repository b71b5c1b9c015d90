// src/client/mod.rs

//! Client side of the quiz: finds a live server among several candidate
//! bases, then drives a quiz session against it.

use std::time::Duration;

pub mod candidates;
pub mod error;
pub mod render;
pub mod resolver;
pub mod session;

pub use candidates::Candidates;
pub use error::ResolveError;
pub use resolver::{Body, Category, Probe, Resolver, ResolverState, Resource};
pub use session::{Participant, Phase, QuizSession, SessionError};

pub const DEFAULT_REMOTE_BASE: &str = "https://quiz-backend.onrender.com";
pub const LOCAL_BASES: [&str; 2] = ["http://localhost:3001", "http://127.0.0.1:3001"];
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Where the client looks for a server, and how long it waits for each probe.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub remote_base: String,
    /// Origin of the page the client was loaded from, when there is one.
    pub origin: Option<String>,
    pub extra_bases: Vec<String>,
    pub local_bases: Vec<String>,
    pub probe_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            remote_base: DEFAULT_REMOTE_BASE.to_string(),
            origin: None,
            extra_bases: Vec::new(),
            local_bases: LOCAL_BASES.iter().map(|b| b.to_string()).collect(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}
