//! Authentication and credential issuance.

pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use credentials::Credentials;
pub use jwt::JwtService;
pub use models::{AuthUser, JwtClaims};
pub use password::PasswordHasher;
