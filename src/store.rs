// src/store.rs

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::{fs, sync::Mutex};

use crate::{
    error::AppError,
    models::{question::Question, submission::SubmissionRecord},
};

/// Read-only view of the question file. Re-read on every request.
#[derive(Debug, Clone)]
pub struct QuestionStore {
    path: PathBuf,
}

impl QuestionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full question set.
    /// A missing file, invalid JSON or an out-of-range answer key is a 500.
    pub async fn load(&self) -> Result<Vec<Question>, AppError> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::InternalServerError(format!(
                "Questions file missing ({}): {}",
                self.path.display(),
                e
            ))
        })?;

        let questions: Vec<Question> = serde_json::from_str(&raw).map_err(|e| {
            AppError::InternalServerError(format!("Questions file is not valid JSON: {}", e))
        })?;

        if let Some(bad) = questions.iter().find(|q| !q.has_valid_answer_key()) {
            return Err(AppError::InternalServerError(format!(
                "Question {} has correctIndex {} but only {} options",
                bad.id,
                bad.correct_index,
                bad.options.len()
            )));
        }

        Ok(questions)
    }
}

/// Append-only submission log kept as one JSON array, rewritten on each append.
///
/// Appends through one `ScoreStore` (and its clones) are serialized by an
/// in-process lock. Independent handles on the same file, e.g. two server
/// processes, are not coordinated and can lose updates.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file as an empty array if it does not exist yet.
    pub async fn ensure_exists(&self) -> Result<(), AppError> {
        if fs::try_exists(&self.path).await? {
            return Ok(());
        }
        tracing::info!("Creating empty score file at {}", self.path.display());
        self.save(&[]).await
    }

    /// Reads every stored record. A missing or corrupt file is a 500.
    pub async fn load(&self) -> Result<Vec<SubmissionRecord>, AppError> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::InternalServerError(format!(
                "Scores file missing ({}): {}",
                self.path.display(),
                e
            ))
        })?;

        serde_json::from_str(&raw).map_err(|e| {
            AppError::InternalServerError(format!("Scores file is not valid JSON: {}", e))
        })
    }

    /// Replaces the whole file with `records`.
    /// Writes to a sibling temp file first so readers never see a half-written array.
    pub async fn save(&self, records: &[SubmissionRecord]) -> Result<(), AppError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Read-modify-write append. A missing file starts a fresh log;
    /// a corrupt one is left untouched and reported.
    pub async fn append(&self, record: SubmissionRecord) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;

        let mut records = if fs::try_exists(&self.path).await? {
            self.load().await?
        } else {
            Vec::new()
        };

        records.push(record);
        self.save(&records).await
    }
}
