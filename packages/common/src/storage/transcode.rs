use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};

use super::error::StoreError;

/// Largest dimension ever stored; larger sources are scaled down to fit,
/// preserving aspect ratio. Smaller sources are never upscaled.
pub const MAX_DIMENSION: u32 = 2000;

/// JPEG sources above this many bytes are converted to lossy WebP.
pub const WEBP_THRESHOLD: u64 = 2 * 1024 * 1024;

/// Quality for lossy re-encodes (JPEG and WebP targets).
pub const LOSSY_QUALITY: u8 = 85;

/// Target encoding for one upload, decided by the deterministic policy
/// in [`TranscodePlan::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranscodePlan {
    /// Large JPEG: convert to lossy WebP.
    Webp,
    /// JPEG at or below the WebP threshold: re-encode as JPEG.
    Jpeg,
    /// PNG: re-encode with maximum lossless compression.
    Png,
    /// Any other image format: apply the resize rule only, keeping the
    /// source encoding.
    ResizeOnly(ImageFormat),
}

impl TranscodePlan {
    /// Policy, evaluated in order on the sniffed source format and size.
    pub fn decide(format: ImageFormat, byte_len: u64) -> TranscodePlan {
        match format {
            ImageFormat::Jpeg if byte_len > WEBP_THRESHOLD => TranscodePlan::Webp,
            ImageFormat::Jpeg => TranscodePlan::Jpeg,
            ImageFormat::Png => TranscodePlan::Png,
            other => TranscodePlan::ResizeOnly(other),
        }
    }
}

/// Output of a transcode run.
pub struct Transcoded {
    pub bytes: Vec<u8>,
    /// Final extension including the dot, e.g. `.webp`.
    pub extension: String,
    pub mime_type: &'static str,
    /// `1 - final/original`, clamped at zero.
    pub ratio: f64,
}

impl Transcoded {
    /// Ratio formatted for reporting, e.g. `34.2%`.
    pub fn ratio_percent(&self) -> String {
        format!("{:.1}%", self.ratio * 100.0)
    }
}

/// Normalizes an uploaded image per the storage policy.
///
/// Pure: operates on byte buffers only, no I/O. The declared MIME type and
/// the size ceiling are checked before any decoding happens; the encoding
/// policy itself keys on the sniffed content format, not on what the
/// caller declared.
pub fn transcode(bytes: &[u8], declared_mime: &str, max_bytes: u64) -> Result<Transcoded, StoreError> {
    if !declared_mime.starts_with("image/") {
        return Err(StoreError::InvalidMediaType(declared_mime.to_string()));
    }
    let len = bytes.len() as u64;
    if len > max_bytes {
        return Err(StoreError::PayloadTooLarge {
            actual: len,
            limit: max_bytes,
        });
    }

    let format = image::guess_format(bytes)?;
    execute(TranscodePlan::decide(format, len), bytes)
}

/// Runs an already-decided plan against the source bytes.
pub fn execute(plan: TranscodePlan, bytes: &[u8]) -> Result<Transcoded, StoreError> {
    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    let needs_resize = img.width().max(img.height()) > MAX_DIMENSION;

    // Untouched passthrough keeps the original bitstream (and any GIF
    // animation) when only the resize rule applies and nothing is oversized.
    if let TranscodePlan::ResizeOnly(format) = plan
        && !needs_resize
    {
        let (extension, mime_type) = media_type(format);
        return Ok(Transcoded {
            bytes: bytes.to_vec(),
            extension,
            mime_type,
            ratio: 0.0,
        });
    }

    let img = if needs_resize {
        img.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3)
    } else {
        img
    };

    let (out, extension, mime_type) = match plan {
        TranscodePlan::Webp => (encode_webp(&img)?, ".webp".to_string(), "image/webp"),
        TranscodePlan::Jpeg => (encode_jpeg(&img)?, ".jpg".to_string(), "image/jpeg"),
        TranscodePlan::Png => (encode_png(&img)?, ".png".to_string(), "image/png"),
        TranscodePlan::ResizeOnly(format) => {
            let (extension, mime_type) = media_type(format);
            (encode_as(&img, format)?, extension, mime_type)
        }
    };

    let ratio = if bytes.is_empty() {
        0.0
    } else {
        (1.0 - out.len() as f64 / bytes.len() as f64).max(0.0)
    };

    Ok(Transcoded {
        bytes: out,
        extension,
        mime_type,
        ratio,
    })
}

fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>, StoreError> {
    // The webp crate only accepts RGB8/RGBA8 buffers.
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let encoder = webp::Encoder::from_image(&rgba)
        .map_err(|e| StoreError::Decode(format!("webp encoding failed: {e}")))?;
    Ok(encoder.encode(f32::from(LOSSY_QUALITY)).to_vec())
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, LOSSY_QUALITY);
    encoder.encode_image(&img.to_rgb8())?;
    Ok(out)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, StoreError> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)?;
    Ok(out)
}

fn encode_as(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, StoreError> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)?;
    Ok(out.into_inner())
}

fn media_type(format: ImageFormat) -> (String, &'static str) {
    let ext = format.extensions_str().first().copied().unwrap_or("bin");
    (format!(".{ext}"), format.to_mime_type())
}
