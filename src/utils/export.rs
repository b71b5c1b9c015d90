// src/utils/export.rs

use crate::{error::AppError, models::submission::SubmissionRecord};

const HEADER: [&str; 6] = ["id", "name", "email", "score", "total", "submittedAt"];

/// Renders submissions as CSV, one row per record, in the given order.
/// Per-question details are left out; the JSON endpoint carries those.
pub fn scores_to_csv(records: &[SubmissionRecord]) -> Result<String, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for record in records {
        writer.write_record([
            record.id.to_string(),
            record.name.clone(),
            record.email.clone(),
            record.score.to_string(),
            record.total.to_string(),
            record.submitted_at.to_rfc3339(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AppError::InternalServerError(e.to_string()))
}
