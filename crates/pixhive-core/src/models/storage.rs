use serde::{Deserialize, Serialize};

/// Storage backend types supported by the upload pipeline.
///
/// Only the local filesystem backend is currently implemented; the enum keeps
/// the wire format and option resolver open to future backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
}

impl StorageBackend {
    /// Parse a backend name, case-insensitive. Unknown names yield `None` so
    /// the option resolver can substitute the default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(StorageBackend::Local),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Local => "local",
        }
    }
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record describing one stored rendition, returned to the caller after a
/// successful write. The caller is responsible for persisting whatever subset
/// it needs for later deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Directory the rendition was written to.
    pub destination: String,
    /// Externally reachable base URL for the destination directory.
    pub base_url: String,
    /// Basename of the rendition on disk.
    pub filename: String,
    /// Backend that holds the file.
    pub storage: StorageBackend,
}

impl StoredFile {
    /// Public URL for this rendition.
    pub fn url(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!(StorageBackend::parse("local"), Some(StorageBackend::Local));
        assert_eq!(StorageBackend::parse("LOCAL"), Some(StorageBackend::Local));
        assert_eq!(StorageBackend::parse("s3"), None);
    }

    #[test]
    fn test_stored_file_url() {
        let file = StoredFile {
            destination: "/var/lib/pixhive/uploads".into(),
            base_url: "http://localhost:3000/uploads/".into(),
            filename: "abc.png".into(),
            storage: StorageBackend::Local,
        };
        assert_eq!(file.url(), "http://localhost:3000/uploads/abc.png");
    }
}
