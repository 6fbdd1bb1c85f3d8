pub mod client;
pub mod generator;
pub mod vision;

// Public API exports
pub use client::{DEFAULT_QUIZ_MODEL, ModelConfig, OpenRouterClient};
pub use generator::{generate_questions, parse_questions};
pub use vision::{DEFAULT_VISION_MODEL, VisionClient, detect_language, merge_analyses};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("OPENROUTER_API_KEY is not set")]
    MissingApiKey,
    #[error("API request failed: {0}")]
    Transport(String),
    #[error("failed to parse model response: {0}")]
    Parse(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Transport(err.to_string())
    }
}
