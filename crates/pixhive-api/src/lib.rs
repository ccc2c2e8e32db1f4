//! Pixhive API
//!
//! HTTP surface of the upload backend: account signup and signin, credential
//! issuance, and the authenticated image upload and delete endpoints backed
//! by the storage adapter.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod users;
