//! Collision-resistant filename generation.
//!
//! Names are derived from 32 bytes of cryptographically strong randomness
//! hashed to a fixed-length 128-bit hex digest. No uniqueness registry is
//! maintained: the digest space makes collisions between concurrent uploads
//! astronomically unlikely.

use md5::{Digest, Md5};
use pixhive_processing::{OutputFormat, RenditionTag};
use rand::RngCore;

/// Generate a random filename with the extension of the configured output
/// format, e.g. `9e107d9d372bb6826bd81d3542a419d6.png`.
pub fn generate(output: OutputFormat) -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);

    let digest = Md5::digest(bytes);
    format!("{}.{}", hex::encode(digest), output.extension())
}

/// Derive the on-disk name for one rendition from the upload's generated
/// filename: responsive size tags are inserted before the extension.
pub fn for_rendition(filename: &str, tag: RenditionTag) -> String {
    match (tag.suffix(), filename.rsplit_once('.')) {
        (Some(suffix), Some((stem, ext))) => format!("{}_{}.{}", stem, suffix, ext),
        (Some(suffix), None) => format!("{}_{}", filename, suffix),
        (None, _) => filename.to_string(),
    }
}

/// Split a responsive rendition filename into `(stem, extension)`.
///
/// Matches `<stem>_<size>.<ext>` the way deletion-time sibling
/// reconstruction expects: stem is everything before the first underscore,
/// extension everything after the first dot following it. Returns `None`
/// for filenames that do not follow the pattern.
pub fn split_responsive(filename: &str) -> Option<(&str, &str)> {
    let (stem, rest) = filename.split_once('_')?;
    let (middle, ext) = rest.split_once('.')?;
    if stem.is_empty() || middle.is_empty() || ext.is_empty() {
        return None;
    }
    Some((stem, ext))
}
