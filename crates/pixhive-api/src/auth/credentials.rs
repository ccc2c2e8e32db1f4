//! API credential generation.
//!
//! Credentials are opaque identifiers handed to account holders for use by
//! client SDKs. The `ph_live_` / `ph_sec_` prefixes make leaked keys easy to
//! spot in logs and repositories.

use rand::RngCore;
use serde::Serialize;
use uuid::Uuid;

const CLIENT_ID_PREFIX: &str = "ph_live_";
const SECRET_KEY_PREFIX: &str = "ph_sec_";

/// A freshly generated credential pair.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub client_id: String,
    pub secret_key: String,
}

impl Credentials {
    /// Generate a new pair. Each call replaces any previously issued pair
    /// once persisted.
    pub fn generate() -> Self {
        let mut secret_bytes = [0u8; 16];
        rand::rng().fill_bytes(&mut secret_bytes);

        Self {
            client_id: format!("{}{}", CLIENT_ID_PREFIX, Uuid::new_v4()),
            secret_key: format!("{}{}", SECRET_KEY_PREFIX, hex::encode(secret_bytes)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_credentials_shape() {
        let creds = Credentials::generate();
        assert!(creds.client_id.starts_with("ph_live_"));
        assert!(creds.secret_key.starts_with("ph_sec_"));

        let secret = creds.secret_key.trim_start_matches("ph_sec_");
        assert_eq!(secret.len(), 32);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_credentials_are_unique() {
        let a = Credentials::generate();
        let b = Credentials::generate();
        assert_ne!(a.client_id, b.client_id);
        assert_ne!(a.secret_key, b.secret_key);
    }
}
