//! Pixhive Processing Library
//!
//! Image-side logic for the upload pipeline: resolving user-supplied upload
//! options against the fixed schema, computing output renditions from a
//! decoded image, and filtering uploads by content type before any buffering.

pub mod filter;
pub mod options;
pub mod renditions;

// Re-export commonly used types
pub use filter::{FilterError, UploadFilter};
pub use options::{OutputFormat, UploadOptions};
pub use renditions::{compute_renditions, encode_rendition, RenditionTag};
