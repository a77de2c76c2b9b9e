#![warn(missing_docs)]
//! GenStudio - an AI image-editing toolbox.
//!
//! A catalog of image-editing tools (pose variation, background swap,
//! watermark removal, creative generation) over the Gemini image API. Each
//! tool family supplies its own validation rules and instruction template;
//! a shared dispatcher builds the request, calls the service and extracts
//! the first returned inline image.
//!
//! # Quick Start
//!
//! ```no_run
//! use genstudio::{Dispatcher, ToolSession};
//!
//! #[tokio::main]
//! async fn main() -> genstudio::Result<()> {
//!     let mut session = ToolSession::new("fission")?;
//!     session.upload(&std::fs::read("model.jpg")?)?;
//!     session.set_prompt("a model spinning around");
//!
//!     let dispatcher = Dispatcher::new();
//!     let result = session.generate(&dispatcher).await?;
//!     std::fs::write("variation.png", result.image.decode()?)?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: static tools, tag groups, presets and sample images
//! - [`session`]: per-tool form state and the generation state machine
//! - [`generate`]: strategies, dispatcher and the Gemini client
//!
//! Error types ([`StudioError`], [`Result`]) are re-exported at the crate
//! root.

pub mod catalog;
mod error;
pub mod generate;
pub mod session;

// Re-export error types at crate root
pub use error::{Result, StudioError};

// Re-export commonly used types
pub use catalog::{Tool, ToolCategory, ToolFamily};
pub use generate::{
    Dispatcher, EncodedImage, GeminiClient, GeminiModel, GeneratedImage, GenerationInput,
    GenerationResult, GenerationService, ImageFormat,
};
pub use session::{GenerationState, ToolSession};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{Result, StudioError};

    pub use crate::catalog::{Tool, ToolCategory, ToolFamily};
    pub use crate::generate::{
        Dispatcher, EncodedImage, GeneratedImage, GenerationInput, GenerationResult,
        GenerationService, ImageFormat,
    };
    pub use crate::session::{GenerationState, ToolSession};
}
