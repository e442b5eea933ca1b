use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::chart::{Playback, TransitionMode};

pub const DEFAULT_DATASET_URL: &str = "https://raw.githubusercontent.com/CHEAH80/MCM7183_Population_Malaysia/refs/heads/main/assets/population_malaysia.csv";

/// Runtime configuration, read once at startup. Every knob has an env var
/// and a default; unparseable values fall back silently.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub dataset_url: String,
    /// Local CSV path. When set it wins over `dataset_url`.
    pub dataset_path: Option<String>,
    pub frame_duration_ms: u64,
    pub transition: TransitionMode,
    pub fetch_timeout_secs: u64,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            dataset_url: std::env::var("DATASET_URL").unwrap_or_else(|_| DEFAULT_DATASET_URL.to_string()),
            dataset_path: std::env::var("DATASET_PATH").ok(),
            frame_duration_ms: std::env::var("FRAME_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(500),
            transition: std::env::var("TRANSITION").ok().and_then(|v| TransitionMode::parse(&v)).unwrap_or(TransitionMode::Immediate),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(30),
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8050),
        }
    }

    pub fn playback(&self) -> Playback {
        Playback {
            frame_duration_ms: self.frame_duration_ms,
            transition: self.transition,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// SHA256 over the serialized config, for run manifests and replay checks.
    pub fn config_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_json().as_bytes());
        hex::encode(hasher.finalize())
    }
}
