//! App error types.

use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid selection script: {0}")]
    Script(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Overlay error: {0}")]
    Overlay(#[from] lipglow_overlay::OverlayError),
}

impl AppError {
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
