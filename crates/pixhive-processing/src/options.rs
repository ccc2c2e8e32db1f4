//! Upload option resolution.
//!
//! User-supplied options arrive as arbitrary JSON (possibly absent). The
//! resolver maps them onto a fully-validated [`UploadOptions`] record,
//! substituting the default for every missing or invalid field. It never
//! fails: invalid input is normalized, not rejected, so no raw value ever
//! reaches the transform engine or the storage backend.

use pixhive_core::StorageBackend;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFAULT_QUALITY: u8 = 70;
const DEFAULT_THRESHOLD: u32 = 500;

/// Output encoding for stored renditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpg,
    #[default]
    Png,
}

impl OutputFormat {
    /// Parse a format name, case-insensitive. Unknown names yield `None` so
    /// the resolver can substitute the default.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpg),
            "png" => Some(OutputFormat::Png),
            _ => None,
        }
    }

    /// Filename extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "jpg",
            OutputFormat::Png => "png",
        }
    }

    pub fn to_mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    pub fn to_image_format(&self) -> image::ImageFormat {
        match self {
            OutputFormat::Jpg => image::ImageFormat::Jpeg,
            OutputFormat::Png => image::ImageFormat::Png,
        }
    }
}

/// Fully-validated upload configuration.
///
/// Constructed once per adapter instance via [`UploadOptions::resolve`] and
/// immutable thereafter. Every field is guaranteed to hold one of its allowed
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    /// Durable medium renditions are persisted to.
    pub storage: StorageBackend,
    /// Encoding for every rendition.
    pub output: OutputFormat,
    /// Desaturate the base image.
    pub greyscale: bool,
    /// Encoder quality hint in 0..=100 (JPEG only; no-op for PNG).
    pub quality: u8,
    /// Crop the base image to a centered square.
    pub square: bool,
    /// Maximum shorter-dimension length before downscaling; 0 disables.
    pub threshold: u32,
    /// Produce large/medium/small variants instead of a single rendition.
    pub responsive: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            storage: StorageBackend::Local,
            output: OutputFormat::Png,
            greyscale: false,
            quality: DEFAULT_QUALITY,
            square: true,
            threshold: DEFAULT_THRESHOLD,
            responsive: false,
        }
    }
}

impl UploadOptions {
    /// Resolve raw user options against the defaults table.
    ///
    /// Pure and idempotent: the same input always yields the same resolved
    /// record, unknown keys are dropped, and invalid values silently fall
    /// back to their defaults. Numeric fields accept numeric strings, which
    /// are coerced before the range check.
    pub fn resolve(raw: Option<&Value>) -> Self {
        let defaults = Self::default();
        let Some(Value::Object(map)) = raw else {
            return defaults;
        };

        Self {
            storage: map
                .get("storage")
                .and_then(Value::as_str)
                .and_then(StorageBackend::parse)
                .unwrap_or(defaults.storage),
            output: map
                .get("output")
                .and_then(Value::as_str)
                .and_then(OutputFormat::parse)
                .unwrap_or(defaults.output),
            greyscale: bool_field(map.get("greyscale"), defaults.greyscale),
            quality: quality_field(map.get("quality"), defaults.quality),
            square: bool_field(map.get("square"), defaults.square),
            threshold: threshold_field(map.get("threshold"), defaults.threshold),
            responsive: bool_field(map.get("responsive"), defaults.responsive),
        }
    }
}

/// Booleans must be JSON booleans; anything else falls back.
fn bool_field(value: Option<&Value>, default: bool) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        _ => default,
    }
}

/// Coerce a JSON number or numeric string to f64.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integer in 0..=100; both boundaries are accepted verbatim.
fn quality_field(value: Option<&Value>, default: u8) -> u8 {
    value
        .and_then(numeric)
        .filter(|q| q.fract() == 0.0 && (0.0..=100.0).contains(q))
        .map(|q| q as u8)
        .unwrap_or(default)
}

/// Non-negative number; 0 disables threshold downscaling.
fn threshold_field(value: Option<&Value>, default: u32) -> u32 {
    value
        .and_then(numeric)
        .filter(|t| t.is_finite() && *t >= 0.0 && *t <= u32::MAX as f64)
        .map(|t| t as u32)
        .unwrap_or(default)
}
