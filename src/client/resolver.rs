// src/client/resolver.rs

use reqwest::{Client as HttpClient, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Candidates, ClientConfig, ResolveError};
use crate::models::{
    question::PublicQuestion,
    submission::{ScoresResponse, SubmissionRecord, SubmitRequest},
};

/// Longest body excerpt written to the log for a failed probe.
pub const LOG_BODY_LIMIT: usize = 200;

const API_PREFIX: &str = "/api";
const SUBMIT_PATH: &str = "/submit";

/// Resources are cached per category: once a base answers for one
/// question-class request it is reused for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Questions,
    Scores,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    Questions,
    Scores {
        limit: Option<usize>,
        offset: Option<usize>,
    },
}

impl Resource {
    pub fn category(&self) -> Category {
        match self {
            Resource::Questions => Category::Questions,
            Resource::Scores { .. } => Category::Scores,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Resource::Questions => "/questions",
            Resource::Scores { .. } => "/scores",
        }
    }

    fn query(&self, token: Option<&str>) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(token) = token {
            query.push(("key", token.to_string()));
        }
        if let Resource::Scores { limit, offset } = self {
            if let Some(limit) = limit {
                query.push(("limit", limit.to_string()));
            }
            if let Some(offset) = offset {
                query.push(("offset", offset.to_string()));
            }
        }
        query
    }
}

/// Last base that answered, per category. `None` means "unknown, discover".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverState {
    questions: Option<String>,
    scores: Option<String>,
}

impl ResolverState {
    pub fn get(&self, category: Category) -> Option<&str> {
        self.slot(category).as_deref()
    }

    pub fn remember(&mut self, category: Category, base: impl Into<String>) {
        *self.slot_mut(category) = Some(base.into());
    }

    pub fn forget(&mut self, category: Category) {
        *self.slot_mut(category) = None;
    }

    fn slot(&self, category: Category) -> &Option<String> {
        match category {
            Category::Questions => &self.questions,
            Category::Scores => &self.scores,
        }
    }

    fn slot_mut(&mut self, category: Category) -> &mut Option<String> {
        match category {
            Category::Questions => &mut self.questions,
            Category::Scores => &mut self.scores,
        }
    }
}

/// Outcome of one probe.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe {
    Structured(Value),
    Text(String),
    /// `status` is `None` when no response arrived at all (refused, timed out, ...).
    Failure {
        status: Option<StatusCode>,
        body: String,
    },
}

impl Probe {
    /// Any 2xx succeeds; a body that is not JSON is still accepted as text.
    pub fn classify(status: StatusCode, body: String) -> Self {
        if !status.is_success() {
            return Probe::Failure {
                status: Some(status),
                body,
            };
        }

        match serde_json::from_str(&body) {
            Ok(value) => Probe::Structured(value),
            Err(_) => Probe::Text(body),
        }
    }

    pub fn into_body(self) -> Option<Body> {
        match self {
            Probe::Structured(value) => Some(Body::Structured(value)),
            Probe::Text(text) => Some(Body::Text(text)),
            Probe::Failure { .. } => None,
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Structured(Value),
    Text(String),
}

impl Body {
    /// Decodes a JSON body into `T`. A plain-text body is a decode error here.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ResolveError> {
        match self {
            Body::Structured(value) => {
                serde_json::from_value(value).map_err(|e| ResolveError::Decode(e.to_string()))
            }
            Body::Text(text) => Err(ResolveError::Decode(format!(
                "expected JSON, got text: {}",
                truncate(&text, LOG_BODY_LIMIT)
            ))),
        }
    }
}

/// Finds a live server among the candidates and remembers it.
///
/// Reads (`fetch`) probe each candidate bare and with an `/api` prefix,
/// strictly one after another, and cache the first base that answers.
/// Writes (`submit`) skip probing and POST directly, one host at a time.
#[derive(Debug)]
pub struct Resolver {
    http: HttpClient,
    candidates: Candidates,
    state: ResolverState,
}

impl Resolver {
    pub fn new(config: &ClientConfig) -> Result<Self, ResolveError> {
        let http = HttpClient::builder()
            .timeout(config.probe_timeout)
            .build()?;
        Ok(Self::with_client(http, Candidates::from_config(config)))
    }

    pub fn with_client(http: HttpClient, candidates: Candidates) -> Self {
        Self {
            http,
            candidates,
            state: ResolverState::default(),
        }
    }

    pub fn candidates(&self) -> &Candidates {
        &self.candidates
    }

    pub fn state(&self) -> &ResolverState {
        &self.state
    }

    /// GETs `resource`, preferring the cached base for its category.
    ///
    /// * Cached base answers → returned without touching any other host.
    /// * Cached base fails → it is forgotten and full discovery runs.
    /// * Discovery tries `base + path` then `base + /api + path` for each
    ///   candidate in order; the first success caches the bare base.
    /// * Nothing answers → `Exhausted` with every URL tried; the cache stays empty.
    ///
    /// `token` is sent as the `key` query parameter.
    pub async fn fetch(
        &mut self,
        resource: &Resource,
        token: Option<&str>,
    ) -> Result<Body, ResolveError> {
        let category = resource.category();
        let path = resource.path();
        let query = resource.query(token);
        let mut attempted = Vec::new();

        if let Some(base) = self.state.get(category).map(str::to_owned) {
            let url = format!("{}{}", base, path);
            attempted.push(url.clone());
            if let Some(body) = self.probe(&url, &query).await.into_body() {
                return Ok(body);
            }
            debug!("Cached base {} failed for {}, rediscovering", base, path);
            self.state.forget(category);
        }

        let bases = self.candidates.bases().to_vec();
        for base in bases {
            let variants = [
                format!("{}{}", base, path),
                format!("{}{}{}", base, API_PREFIX, path),
            ];
            for url in variants {
                attempted.push(url.clone());
                if let Some(body) = self.probe(&url, &query).await.into_body() {
                    info!("Resolved {:?} to {}", category, base);
                    self.state.remember(category, base.clone());
                    return Ok(body);
                }
            }
        }

        Err(ResolveError::Exhausted {
            resource: path.to_string(),
            attempted,
        })
    }

    /// POSTs a submission, trying the cached questions base first and then
    /// every candidate once, in order.
    ///
    /// There is no idempotency key: if a host fails after committing the
    /// record, the next host records it again.
    pub async fn submit(
        &mut self,
        request: &SubmitRequest,
    ) -> Result<SubmissionRecord, ResolveError> {
        let cached = self.state.get(Category::Questions).map(str::to_owned);

        let mut bases: Vec<String> = cached.iter().cloned().collect();
        bases.extend(
            self.candidates
                .bases()
                .iter()
                .filter(|b| Some(*b) != cached.as_ref())
                .cloned(),
        );

        let mut attempted = Vec::new();
        for base in bases {
            let url = format!("{}{}", base, SUBMIT_PATH);
            attempted.push(url.clone());

            match self.post_json(&url, request).await {
                Probe::Structured(value) => {
                    // A 2xx means the server may already have stored the record;
                    // never retry elsewhere past this point.
                    let record = serde_json::from_value(value)
                        .map_err(|e| ResolveError::Decode(e.to_string()))?;
                    self.state.remember(Category::Questions, base);
                    return Ok(record);
                }
                Probe::Text(text) => {
                    return Err(ResolveError::Decode(format!(
                        "{} answered with text: {}",
                        url,
                        truncate(&text, LOG_BODY_LIMIT)
                    )));
                }
                Probe::Failure { .. } => {
                    if cached.as_deref() == Some(base.as_str()) {
                        self.state.forget(Category::Questions);
                    }
                }
            }
        }

        Err(ResolveError::Exhausted {
            resource: SUBMIT_PATH.to_string(),
            attempted,
        })
    }

    pub async fn questions(&mut self) -> Result<Vec<PublicQuestion>, ResolveError> {
        self.fetch(&Resource::Questions, None).await?.decode()
    }

    /// `limit == 0` asks for the whole list instead of a page.
    pub async fn scores(
        &mut self,
        key: &str,
        limit: usize,
        offset: usize,
    ) -> Result<ScoresResponse, ResolveError> {
        let resource = if limit > 0 {
            Resource::Scores {
                limit: Some(limit),
                offset: Some(offset),
            }
        } else {
            Resource::Scores {
                limit: None,
                offset: None,
            }
        };
        self.fetch(&resource, Some(key)).await?.decode()
    }

    async fn probe(&self, url: &str, query: &[(&'static str, String)]) -> Probe {
        self.execute(url, self.http.get(url).query(query)).await
    }

    async fn post_json(&self, url: &str, request: &SubmitRequest) -> Probe {
        self.execute(url, self.http.post(url).json(request)).await
    }

    async fn execute(&self, url: &str, request: RequestBuilder) -> Probe {
        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                match response.text().await {
                    Ok(body) => Probe::classify(status, body),
                    Err(e) => Probe::Failure {
                        status: Some(status),
                        body: e.to_string(),
                    },
                }
            }
            Err(e) => Probe::Failure {
                status: None,
                body: e.to_string(),
            },
        };
        log_failure(url, &outcome);
        outcome
    }
}

fn log_failure(url: &str, outcome: &Probe) {
    if let Probe::Failure { status, body } = outcome {
        let status = status.map_or_else(|| "no response".to_string(), |s| s.to_string());
        warn!(
            %url,
            %status,
            body = %truncate(body, LOG_BODY_LIMIT),
            "Request failed"
        );
    }
}

/// Cuts `text` to at most `limit` characters, on a char boundary.
pub fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}
