//! Upload acceptance filter.
//!
//! Checks a field's declared content type against the configured allow-list.
//! The adapter runs this before any buffering begins, so rejected uploads
//! never consume memory for the file body.

/// Rejection raised by the upload filter.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Missing content type")]
    MissingContentType,
}

/// Content-type allow-list filter for incoming upload fields.
#[derive(Debug, Clone)]
pub struct UploadFilter {
    allowed_content_types: Vec<String>,
}

impl UploadFilter {
    pub fn new(allowed_content_types: Vec<String>) -> Self {
        Self {
            allowed_content_types: allowed_content_types
                .into_iter()
                .map(|t| t.to_lowercase())
                .collect(),
        }
    }

    /// Accept or reject a declared content type.
    pub fn check(&self, content_type: &str) -> Result<(), FilterError> {
        if content_type.is_empty() {
            return Err(FilterError::MissingContentType);
        }

        let normalized = content_type.to_lowercase();
        if !self.allowed_content_types.iter().any(|ct| ct == &normalized) {
            return Err(FilterError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> UploadFilter {
        UploadFilter::new(vec!["image/jpeg".to_string(), "image/png".to_string()])
    }

    #[test]
    fn test_allowed_content_types_pass() {
        assert!(filter().check("image/jpeg").is_ok());
        assert!(filter().check("image/png").is_ok());
        assert!(filter().check("IMAGE/PNG").is_ok());
    }

    #[test]
    fn test_disallowed_content_type_rejected() {
        let result = filter().check("application/pdf");
        assert!(matches!(
            result,
            Err(FilterError::InvalidContentType { .. })
        ));
    }

    #[test]
    fn test_missing_content_type_rejected() {
        assert!(matches!(
            filter().check(""),
            Err(FilterError::MissingContentType)
        ));
    }
}
