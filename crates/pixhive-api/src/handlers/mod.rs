//! HTTP request handlers.

pub mod auth;
pub mod credentials;
pub mod media_delete;
pub mod upload;
