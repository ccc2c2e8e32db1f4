//! Pixhive Core Library
//!
//! Shared types for the pixhive upload backend: configuration, error types,
//! domain models, and constants used across the workspace.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{StorageBackend, StoredFile, User, UserRole, UserStatus};
