//! Domain models shared across the workspace.

mod storage;
mod user;

pub use storage::{StorageBackend, StoredFile};
pub use user::{User, UserResponse, UserRole, UserStatus};
