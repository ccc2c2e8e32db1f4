//! Application-wide constants: upload limits, content-type allow-list, and
//! the fixed credentials returned by the public test-keys endpoint.

/// Content types accepted by the upload filter.
pub const ALLOWED_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/pjpeg", "image/png", "image/gif"];

/// Maximum number of files per upload request.
pub const MAX_FILES_PER_REQUEST: usize = 1;

/// Default maximum upload size in bytes (10 MiB).
pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;

/// Default bcrypt cost for password hashing.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Fixed credentials served by the unauthenticated test-keys endpoint so
/// integrators can exercise the API without an account.
pub const TEST_CLIENT_ID: &str = "ph_test_b6f244eb-438d-4f07-8ca7-651895557ae3";
pub const TEST_SECRET_KEY: &str = "ph_test_PVS49TY8E6MY1ZHJKPA66JNAQNRY";
