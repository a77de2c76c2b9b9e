//! The external generation service boundary.

use crate::error::Result;
use crate::generate::gemini::GeminiModel;
use crate::generate::types::{GeneratedImage, OutputConfig};
use async_trait::async_trait;

/// An inline image payload: raw base64 plus its declared media type, with any
/// data-URL envelope already stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Declared MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

/// A fully-built request for the generation service: instruction text,
/// at most one inline image, and optional output configuration.
#[derive(Debug, Clone)]
pub struct ServiceRequest {
    /// Model to invoke.
    pub model: GeminiModel,
    /// Instruction text produced by the tool strategy.
    pub instruction: String,
    /// Optional source image.
    pub image: Option<InlineImage>,
    /// Optional fixed output configuration.
    pub output: Option<OutputConfig>,
}

/// Trait for the external generation service.
///
/// The production implementation is [`GeminiClient`](super::GeminiClient);
/// tests substitute a scripted in-memory service.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Sends the request and returns the first image the service produced.
    async fn generate(&self, request: &ServiceRequest) -> Result<GeneratedImage>;
}
