// src/models/submission.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{models::question::QuestionId, scoring::Scored};

pub const ANONYMOUS: &str = "anonymous";

/// A participant's answer to one question. `None` means "not attempted".
/// The index is taken as sent; one outside the options is simply wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub id: QuestionId,
    #[serde(default)]
    pub choice_index: Option<i64>,
}

/// DTO for submitting a quiz attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub answers: Vec<Answer>,
}

/// Per-question outcome stored with every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDetail {
    pub id: QuestionId,
    pub chosen: Option<i64>,
    pub correct: usize,
    pub is_correct: bool,
}

/// Identifier of a stored submission.
/// New records get a v4 UUID; score files written by older servers carry
/// millisecond timestamps instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Uuid(Uuid),
    Number(i64),
}

impl RecordId {
    pub fn generate() -> Self {
        RecordId::Uuid(Uuid::new_v4())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Uuid(id) => write!(f, "{}", id),
            RecordId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// One persisted quiz attempt. Immutable once appended to the score file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub score: usize,
    pub total: usize,
    pub details: Vec<AnswerDetail>,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionRecord {
    pub fn new(name: Option<String>, email: Option<String>, scored: Scored) -> Self {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| ANONYMOUS.to_string());
        let email = email.map(|e| e.trim().to_string()).unwrap_or_default();

        Self {
            id: RecordId::generate(),
            name,
            email,
            score: scored.score,
            total: scored.total,
            details: scored.details,
            submitted_at: Utc::now(),
        }
    }
}

/// Paginated slice of the score file, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoresPage {
    pub total: usize,
    pub items: Vec<SubmissionRecord>,
}

/// `GET /scores` answers with a page when `limit` is set, otherwise with the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoresResponse {
    Page(ScoresPage),
    List(Vec<SubmissionRecord>),
}

impl ScoresResponse {
    /// Records carried by this response, whichever shape it has.
    pub fn items(&self) -> &[SubmissionRecord] {
        match self {
            ScoresResponse::Page(page) => &page.items,
            ScoresResponse::List(items) => items,
        }
    }

    /// Total number of records on the server.
    pub fn total(&self) -> usize {
        match self {
            ScoresResponse::Page(page) => page.total,
            ScoresResponse::List(items) => items.len(),
        }
    }
}
