//! Configuration module
//!
//! Configuration is read once at startup from the environment (a `.env` file
//! is honored in development). Every value except `JWT_SECRET` has a default
//! suitable for local development.

use std::env;

use crate::constants;

const DEFAULT_PORT: u16 = 3000;
const JWT_EXPIRY_HOURS: i64 = 24;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    environment: String,
    cors_origins: Vec<String>,
    jwt_secret: String,
    jwt_expiry_hours: i64,
    bcrypt_cost: u32,
    /// Root directory for stored renditions.
    storage_path: String,
    /// Base URL under which `storage_path` is served.
    base_url: String,
    /// Multipart field name carrying the upload.
    upload_field: String,
    max_file_size_bytes: usize,
    allowed_content_types: Vec<String>,
    /// Raw upload options as configured (JSON object); validated by the
    /// option resolver at adapter construction, never used directly.
    upload_options: Option<serde_json::Value>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok());

        let allowed_content_types = env::var("ALLOWED_CONTENT_TYPES")
            .map(|s| {
                s.split(',')
                    .map(|t| t.trim().to_lowercase())
                    .filter(|t| !t.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| {
                constants::ALLOWED_CONTENT_TYPES
                    .iter()
                    .map(|t| t.to_string())
                    .collect()
            });

        let upload_options = match env::var("UPLOAD_OPTIONS") {
            Ok(raw) => Some(serde_json::from_str(&raw).map_err(|e| {
                anyhow::anyhow!("UPLOAD_OPTIONS is not valid JSON: {}", e)
            })?),
            Err(_) => None,
        };

        Ok(Config {
            server_port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            environment,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET").unwrap_or_default(),
            jwt_expiry_hours: env::var("JWT_EXPIRY_HOURS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(JWT_EXPIRY_HOURS),
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(constants::DEFAULT_BCRYPT_COST),
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "uploads".to_string()),
            base_url: env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000/uploads".to_string()),
            upload_field: env::var("UPLOAD_FIELD").unwrap_or_else(|_| "image".to_string()),
            max_file_size_bytes: max_file_size_mb
                .map(|mb| mb * 1024 * 1024)
                .unwrap_or(constants::DEFAULT_MAX_FILE_SIZE_BYTES),
            allowed_content_types,
            upload_options,
        })
    }

    /// Fail fast on misconfiguration before the server starts.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT_SECRET must be set");
        }
        if self.is_production() && self.jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 bytes in production");
        }
        if self.max_file_size_bytes == 0 {
            anyhow::bail!("MAX_FILE_SIZE_MB must be greater than zero");
        }
        if self.allowed_content_types.is_empty() {
            anyhow::bail!("ALLOWED_CONTENT_TYPES must not be empty");
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    pub fn jwt_expiry_hours(&self) -> i64 {
        self.jwt_expiry_hours
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    pub fn storage_path(&self) -> &str {
        &self.storage_path
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn upload_field(&self) -> &str {
        &self.upload_field
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.allowed_content_types
    }

    pub fn upload_options(&self) -> Option<&serde_json::Value> {
        self.upload_options.as_ref()
    }
}

impl Config {
    /// Construct a configuration for tests without touching the environment.
    pub fn for_tests(storage_path: String, base_url: String) -> Self {
        Config {
            server_port: 0,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            jwt_secret: "test-secret-test-secret-test-secret".to_string(),
            jwt_expiry_hours: JWT_EXPIRY_HOURS,
            bcrypt_cost: 4,
            storage_path,
            base_url,
            upload_field: "image".to_string(),
            max_file_size_bytes: constants::DEFAULT_MAX_FILE_SIZE_BYTES,
            allowed_content_types: constants::ALLOWED_CONTENT_TYPES
                .iter()
                .map(|t| t.to_string())
                .collect(),
            upload_options: None,
        }
    }
}
