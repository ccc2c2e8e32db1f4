//! Image transform engine.
//!
//! Derives one or more output renditions from a decoded image according to a
//! resolved [`UploadOptions`]. A single base image is computed first
//! (threshold downscale, centered square crop, greyscale), then each
//! rendition is a clone of the base scaled by its fixed factor, so all
//! renditions share identical crop/greyscale/quality and differ only in
//! final pixel dimensions.

use crate::options::{OutputFormat, UploadOptions};
use anyhow::Result;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

/// Tag identifying one concrete output rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenditionTag {
    /// The only rendition when `responsive` is disabled.
    Single,
    Large,
    Medium,
    Small,
}

impl RenditionTag {
    /// Filename suffix inserted before the extension, if any.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            RenditionTag::Single => None,
            RenditionTag::Large => Some("lg"),
            RenditionTag::Medium => Some("md"),
            RenditionTag::Small => Some("sm"),
        }
    }

    /// Scale factor applied to the base image for this rendition.
    pub fn scale(&self) -> f32 {
        match self {
            RenditionTag::Single | RenditionTag::Large => 1.0,
            RenditionTag::Medium => 0.7,
            RenditionTag::Small => 0.3,
        }
    }

    /// The three responsive size tags, largest first.
    pub fn responsive_sizes() -> [RenditionTag; 3] {
        [RenditionTag::Large, RenditionTag::Medium, RenditionTag::Small]
    }
}

/// Compute all renditions for an upload.
///
/// The source image is never mutated; the base is derived on a clone and each
/// responsive variant on a clone of the base. All renditions are produced
/// unconditionally; whether one later fails to persist is the sink's concern.
pub fn compute_renditions(
    image: &DynamicImage,
    opts: &UploadOptions,
) -> Vec<(RenditionTag, DynamicImage)> {
    let base = compute_base(image, opts);

    if !opts.responsive {
        return vec![(RenditionTag::Single, base)];
    }

    RenditionTag::responsive_sizes()
        .into_iter()
        .map(|tag| {
            let image = match tag {
                RenditionTag::Large => base.clone(),
                _ => scale(&base, tag.scale()),
            };
            (tag, image)
        })
        .collect()
}

/// Apply the shared transform steps: threshold downscale, square crop,
/// greyscale. Quality is an encode-time concern.
fn compute_base(image: &DynamicImage, opts: &UploadOptions) -> DynamicImage {
    let mut base = image.clone();
    let (width, height) = base.dimensions();
    let shorter = width.min(height);
    let threshold = opts.threshold;

    // Downscale so the shorter dimension equals the threshold exactly,
    // preserving aspect ratio. Never upscales.
    if threshold > 0 && shorter > threshold {
        let (new_width, new_height) = if width <= height {
            (threshold, scaled_dim(height, threshold, width))
        } else {
            (scaled_dim(width, threshold, height), threshold)
        };
        base = base.resize_exact(new_width, new_height, FilterType::Lanczos3);
    }

    if opts.square {
        let (width, height) = base.dimensions();
        let mut side = width.min(height);
        if threshold > 0 {
            side = side.min(threshold);
        }
        // Centered crop; the minimum dimension always bounds the side, so
        // small sources are never upscaled.
        let x = (width - side) / 2;
        let y = (height - side) / 2;
        base = base.crop_imm(x, y, side, side);
    }

    if opts.greyscale {
        base = base.grayscale();
    }

    base
}

/// Scale the free dimension proportionally when the fixed one is pinned to
/// the threshold.
fn scaled_dim(free: u32, threshold: u32, fixed: u32) -> u32 {
    (((free as f64) * (threshold as f64) / (fixed as f64)).round() as u32).max(1)
}

/// Scale both dimensions of the base by a rendition factor, rounding and
/// flooring at one pixel.
fn scale(base: &DynamicImage, factor: f32) -> DynamicImage {
    let (width, height) = base.dimensions();
    let new_width = ((width as f32 * factor).round() as u32).max(1);
    let new_height = ((height as f32 * factor).round() as u32).max(1);
    base.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Encode a rendition to its output bytes.
///
/// The quality hint applies to JPEG; PNG is lossless and ignores it.
pub fn encode_rendition(
    image: &DynamicImage,
    output: OutputFormat,
    quality: u8,
) -> Result<Vec<u8>> {
    let (width, height) = image.dimensions();
    let estimated_size = (width * height * 3) as usize;
    let mut buffer = Vec::with_capacity(estimated_size);
    let mut cursor = Cursor::new(&mut buffer);

    match output {
        OutputFormat::Jpg => {
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
            image.write_with_encoder(encoder)?;
        }
        OutputFormat::Png => {
            image.write_to(&mut cursor, image::ImageFormat::Png)?;
        }
    }

    Ok(buffer)
}
