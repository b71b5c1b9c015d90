// src/handlers/scores.rs

use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    config::Config,
    error::AppError,
    models::submission::{ScoresPage, ScoresResponse, SubmissionRecord},
    store::ScoreStore,
    utils::export::scores_to_csv,
};

/// Query parameters for the score endpoints.
/// `limit` and `offset` stay strings so junk values degrade instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct ScoresParams {
    pub key: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ScoresParams {
    fn limit(&self) -> usize {
        leading_count(self.limit.as_deref())
    }

    fn offset(&self) -> usize {
        leading_count(self.offset.as_deref())
    }
}

/// Reads the leading decimal digits, so `"10.5"` and `"5abc"` count as 10 and 5.
/// No digits, or a negative number, is 0. Overflow saturates.
fn leading_count(value: Option<&str>) -> usize {
    let Some(value) = value else { return 0 };
    let value = value.trim_start();
    let (negative, rest) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if negative || digits.is_empty() {
        return 0;
    }
    digits.parse().unwrap_or(usize::MAX)
}

/// Fails closed: no configured key means nobody gets in.
pub fn authorize(config: &Config, provided: Option<&str>) -> Result<(), AppError> {
    let Some(expected) = config.scores_key.as_deref() else {
        return Err(AppError::Forbidden(
            "Scores endpoint is disabled on this server (SCORES_KEY not set).".to_string(),
        ));
    };

    match provided {
        Some(key) if !key.is_empty() && key == expected => Ok(()),
        _ => Err(AppError::Forbidden(
            "Forbidden - invalid or missing key".to_string(),
        )),
    }
}

/// Sorts newest submission first. Stable, so equal timestamps keep file order.
pub fn newest_first(mut records: Vec<SubmissionRecord>) -> Vec<SubmissionRecord> {
    records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
    records
}

/// `limit == 0` returns everything as a bare list; otherwise a `{ total, items }` page.
pub fn paginate(records: Vec<SubmissionRecord>, limit: usize, offset: usize) -> ScoresResponse {
    if limit == 0 {
        return ScoresResponse::List(records);
    }

    let total = records.len();
    let items = records.into_iter().skip(offset).take(limit).collect();
    ScoresResponse::Page(ScoresPage { total, items })
}

/// Lists stored submissions, newest first.
/// Requires `?key=` to match `SCORES_KEY`.
pub async fn list_scores(
    State(config): State<Config>,
    State(scores): State<ScoreStore>,
    Query(params): Query<ScoresParams>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&config, params.key.as_deref())?;

    let records = newest_first(scores.load().await?);

    Ok(Json(paginate(records, params.limit(), params.offset())))
}

/// Same gate as `list_scores`, but answers with a CSV download.
pub async fn export_scores(
    State(config): State<Config>,
    State(scores): State<ScoreStore>,
    Query(params): Query<ScoresParams>,
) -> Result<impl IntoResponse, AppError> {
    authorize(&config, params.key.as_deref())?;

    let records = newest_first(scores.load().await?);
    let csv = scores_to_csv(&records)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"scores.csv\"",
            ),
        ],
        csv,
    ))
}
