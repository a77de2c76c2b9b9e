//! Core types for generation requests and results.

use crate::error::{Result, StudioError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum accepted size for an uploaded source image, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

/// Media types accepted for source images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    Png,
    /// JPEG format (lossy). The default when a payload carries no declared type.
    #[default]
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Parses the format token of a data-URL envelope (`png`, `jpeg`, `jpg`,
    /// `webp`). `jpg` is normalized to JPEG.
    pub fn from_envelope_token(token: &str) -> Option<Self> {
        match token {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Attempts to detect format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::from_envelope_token(&ext.to_lowercase())
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// An image carried inline as a base64 data URL
/// (`data:image/png;base64,...`).
///
/// This is the single representation used for uploads, fetched samples and
/// generation results, so the dispatcher cannot distinguish where an image
/// came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage(String);

impl EncodedImage {
    /// Wraps an existing data-URL string without validating it.
    ///
    /// A string with no recognizable envelope is treated as a bare base64
    /// payload of declared type JPEG, matching [`Self::media_type`].
    pub fn from_data_url(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Encodes raw image bytes of a known format into a data URL.
    pub fn from_bytes(data: &[u8], format: ImageFormat) -> Self {
        use base64::Engine;
        let payload = base64::engine::general_purpose::STANDARD.encode(data);
        Self(format!("data:{};base64,{}", format.mime_type(), payload))
    }

    /// Validates and encodes user-supplied bytes (an upload or a fetched
    /// sample).
    ///
    /// Rejects payloads above [`MAX_UPLOAD_BYTES`] and anything whose magic
    /// bytes are not one of {png, jpeg, webp}, before any encoding occurs.
    pub fn from_upload(data: &[u8]) -> Result<Self> {
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(StudioError::InvalidInput(
                "image exceeds the 15 MB size limit".into(),
            ));
        }
        let format = ImageFormat::from_magic_bytes(data).ok_or_else(|| {
            StudioError::InvalidInput("unsupported image type (expected png, jpeg or webp)".into())
        })?;
        Ok(Self::from_bytes(data, format))
    }

    /// The declared media type, re-derived from the envelope prefix.
    ///
    /// Defaults to JPEG when the envelope is absent or malformed.
    pub fn media_type(&self) -> ImageFormat {
        self.split_envelope()
            .map(|(format, _)| format)
            .unwrap_or_default()
    }

    /// The raw base64 payload with the envelope stripped.
    ///
    /// When no envelope is recognized the entire string is treated as the
    /// payload.
    pub fn payload(&self) -> &str {
        self.split_envelope()
            .map(|(_, payload)| payload)
            .unwrap_or(&self.0)
    }

    /// The full data-URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the base64 payload back into raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(self.payload())
            .map_err(|e| StudioError::Decode(e.to_string()))
    }

    fn split_envelope(&self) -> Option<(ImageFormat, &str)> {
        let rest = self.0.strip_prefix("data:image/")?;
        let semi = rest.find(";base64,")?;
        let format = ImageFormat::from_envelope_token(&rest[..semi])?;
        Some((format, &rest[semi + ";base64,".len()..]))
    }
}

impl std::fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-tool options collected by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOptions {
    /// Selected background preset id (background-swap family).
    pub background_preset: Option<String>,
    /// Product category label interpolated into the instruction
    /// (background-swap family).
    pub category: Option<String>,
}

/// User-supplied inputs for one generation dispatch.
#[derive(Debug, Clone, Default)]
pub struct GenerationInput {
    /// Source image, required by every family except creative.
    pub source_image: Option<EncodedImage>,
    /// Free-text prompt as typed by the user. May be empty depending on the
    /// tool family.
    pub prompt: String,
    /// Tool-specific options.
    pub options: ToolOptions,
}

impl GenerationInput {
    /// Creates an input with only a prompt (creative family).
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Creates an input with only a source image (watermark-removal family).
    pub fn from_image(image: EncodedImage) -> Self {
        Self {
            source_image: Some(image),
            ..Self::default()
        }
    }
}

/// Fixed output configuration requested from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Resolution tier, e.g. `1K`.
    pub image_size: &'static str,
    /// Aspect ratio, e.g. `3:4`.
    pub aspect_ratio: &'static str,
}

/// A generated image with its bytes and generation metadata.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// Image format as declared by the service.
    pub format: ImageFormat,
    /// Model that produced the image.
    pub model: Option<String>,
    /// Generation duration in milliseconds.
    pub duration_ms: Option<u64>,
}

impl GeneratedImage {
    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }

    /// Re-encodes the image into the inline data-URL representation.
    pub fn to_encoded(&self) -> EncodedImage {
        EncodedImage::from_bytes(&self.data, self.format)
    }
}

/// The outcome of a successful generation, as shown next to the original.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    /// Identifier derived from the creation timestamp.
    pub id: String,
    /// The produced image, inline-encoded.
    pub image: EncodedImage,
    /// The prompt the user actually submitted — not the instruction text the
    /// dispatcher substituted or templated around it.
    pub prompt: String,
    /// Creation time in unix milliseconds.
    pub timestamp_ms: u64,
}

impl GenerationResult {
    /// Creates a result stamped with the current time.
    pub fn new(image: EncodedImage, prompt: impl Into<String>) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id: timestamp_ms.to_string(),
            image,
            prompt: prompt.into(),
            timestamp_ms,
        }
    }
}
