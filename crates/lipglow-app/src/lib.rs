//! Lip overlay demo.
//!
//! This crate provides:
//! - Environment-driven app configuration
//! - A synthetic camera, landmark detector and permission provider
//! - Scripted feature selection standing in for menu taps

pub mod config;
pub mod error;
pub mod script;
pub mod synthetic;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use script::{SelectionScript, SelectionStep};
pub use synthetic::{SyntheticCamera, SyntheticDetector, SyntheticPermissions};
