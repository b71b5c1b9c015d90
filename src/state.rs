// src/state.rs

use crate::{
    config::Config,
    store::{QuestionStore, ScoreStore},
};
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub questions: QuestionStore,
    pub scores: ScoreStore,
    pub config: Config,
}

impl AppState {
    /// Opens both stores at the paths named in `config`.
    pub fn new(config: Config) -> Self {
        Self {
            questions: QuestionStore::new(&config.questions_file_path),
            scores: ScoreStore::new(&config.scores_file_path),
            config,
        }
    }
}

impl FromRef<AppState> for QuestionStore {
    fn from_ref(state: &AppState) -> Self {
        state.questions.clone()
    }
}

impl FromRef<AppState> for ScoreStore {
    fn from_ref(state: &AppState) -> Self {
        state.scores.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
