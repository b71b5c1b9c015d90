// src/config.rs

use std::{env, path::PathBuf};

use dotenvy::dotenv;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_QUESTIONS_FILE: &str = "questions.json";
pub const DEFAULT_SCORES_FILE: &str = "scores.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// `*`, or a comma separated list of allowed origins.
    pub cors_origin: String,
    pub questions_file_path: PathBuf,
    pub scores_file_path: PathBuf,
    /// Shared secret for the score endpoints. `None` disables them entirely.
    pub scores_key: Option<String>,
    pub rust_log: String,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let port = env::var("PORT")
            .ok()
            .and_then(|port| port.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origin = env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string());

        let questions_file_path = env::var("QUESTIONS_FILE_PATH")
            .unwrap_or_else(|_| DEFAULT_QUESTIONS_FILE.to_string())
            .into();

        let scores_file_path = env::var("SCORES_FILE_PATH")
            .unwrap_or_else(|_| DEFAULT_SCORES_FILE.to_string())
            .into();

        let scores_key = env::var("SCORES_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Self {
            port,
            cors_origin,
            questions_file_path,
            scores_file_path,
            scores_key,
            rust_log,
            log_dir,
        }
    }
}
