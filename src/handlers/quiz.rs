// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::{
        question::PublicQuestion,
        submission::{SubmissionRecord, SubmitRequest},
    },
    scoring,
    store::{QuestionStore, ScoreStore},
};

/// Returns the full question set without answer keys.
/// Correctness is only ever revealed by `POST /submit`.
pub async fn list_questions(
    State(questions): State<QuestionStore>,
) -> Result<impl IntoResponse, AppError> {
    let public_questions: Vec<PublicQuestion> = questions
        .load()
        .await?
        .into_iter()
        .map(PublicQuestion::from)
        .collect();

    Ok(Json(public_questions))
}

/// Scores a submission against the current question set and appends it to the score file.
///
/// * The score is always recomputed here; nothing the client computed is trusted.
/// * Every question in the store gets a detail entry, answered or not.
/// * Responds with the full stored record.
pub async fn submit_answers(
    State(questions): State<QuestionStore>,
    State(scores): State<ScoreStore>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload?;

    let question_set = questions.load().await?;
    let scored = scoring::score(&question_set, &req.answers);
    let record = SubmissionRecord::new(req.name, req.email, scored);

    scores.append(record.clone()).await.map_err(|e| {
        tracing::error!("Failed to persist submission {}: {:?}", record.id, e);
        e
    })?;

    tracing::info!(
        id = %record.id,
        score = record.score,
        total = record.total,
        "Submission recorded"
    );

    Ok(Json(record))
}
