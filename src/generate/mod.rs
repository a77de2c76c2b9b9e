//! Generation request layer: per-family strategies, the dispatcher and the
//! Gemini service client.

mod dispatch;
mod gemini;
mod service;
mod strategy;
mod types;

pub use dispatch::{validate_input, Dispatcher};
pub use gemini::{GeminiClient, GeminiClientBuilder, GeminiModel, API_KEY_VAR};
pub use service::{GenerationService, InlineImage, ServiceRequest};
pub use strategy::{strategy_for, ToolStrategy, DEFAULT_VARIATION_ACTION};
pub use types::{
    EncodedImage, GeneratedImage, GenerationInput, GenerationResult, ImageFormat, OutputConfig,
    ToolOptions, MAX_UPLOAD_BYTES,
};
