//! Per-tool form state and its generation state machine.
//!
//! One [`ToolSession`] tracks the active tool, the selected image, prompt and
//! options, and the single in-flight generation. Switching tools resets the
//! form unconditionally.

use crate::catalog::{self, Tool, ToolFamily};
use crate::error::{Result, StudioError};
use crate::generate::{
    validate_input, Dispatcher, EncodedImage, GeneratedImage, GenerationInput, GenerationResult,
    ToolOptions,
};

/// Hard cap on prompt length, in characters.
pub const PROMPT_MAX_CHARS: usize = 500;

/// The state of the active form's generation.
///
/// A result exists only in `Succeeded`; an error message only in `Failed`.
#[derive(Debug, Clone, Default)]
pub enum GenerationState {
    /// Nothing in flight, nothing produced.
    #[default]
    Idle,
    /// A sample image is being fetched and re-encoded.
    Uploading,
    /// A generation request is in flight.
    Generating,
    /// The last dispatch produced an image.
    Succeeded(GenerationResult),
    /// The last dispatch failed; recoverable by dispatching again.
    Failed(String),
}

impl GenerationState {
    /// True while a generation request is in flight.
    pub fn is_generating(&self) -> bool {
        matches!(self, Self::Generating)
    }

    /// The result, if the last dispatch succeeded.
    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// The error message, if the last dispatch failed.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The mutable per-tool-session form state.
pub struct ToolSession {
    tool: &'static Tool,
    source_image: Option<EncodedImage>,
    prompt: String,
    options: ToolOptions,
    state: GenerationState,
}

impl ToolSession {
    /// Creates a session for a catalog tool.
    pub fn new(tool_id: &str) -> Result<Self> {
        let tool = catalog::find_tool(tool_id)
            .ok_or_else(|| StudioError::InvalidInput(format!("unknown tool: {tool_id}")))?;
        Ok(Self {
            tool,
            source_image: None,
            prompt: String::new(),
            options: ToolOptions::default(),
            state: GenerationState::Idle,
        })
    }

    /// The active tool.
    pub fn tool(&self) -> &'static Tool {
        self.tool
    }

    /// The current generation state.
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    /// The currently selected source image.
    pub fn source_image(&self) -> Option<&EncodedImage> {
        self.source_image.as_ref()
    }

    /// The current prompt text.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The current tool options.
    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    /// Switches the active tool, clearing image, prompt, options, state and
    /// result unconditionally — including mid-Generating.
    pub fn select_tool(&mut self, tool_id: &str) -> Result<()> {
        let tool = catalog::find_tool(tool_id)
            .ok_or_else(|| StudioError::InvalidInput(format!("unknown tool: {tool_id}")))?;
        self.tool = tool;
        self.source_image = None;
        self.prompt.clear();
        self.options = ToolOptions::default();
        self.state = GenerationState::Idle;
        Ok(())
    }

    /// Validates and selects user-supplied image bytes (an upload).
    pub fn upload(&mut self, bytes: &[u8]) -> Result<()> {
        self.source_image = Some(EncodedImage::from_upload(bytes)?);
        Ok(())
    }

    /// Selects an already-encoded image.
    pub fn set_source_image(&mut self, image: EncodedImage) {
        self.source_image = Some(image);
    }

    /// Fetches a sample image and re-encodes it like an upload, so the
    /// dispatcher cannot distinguish the two. The state passes through
    /// Uploading for the duration of the fetch.
    pub async fn select_sample(&mut self, client: &reqwest::Client, url: &str) -> Result<()> {
        let previous = std::mem::replace(&mut self.state, GenerationState::Uploading);
        let fetched = fetch_sample(client, url).await;
        self.state = previous;
        self.source_image = Some(fetched?);
        Ok(())
    }

    /// Replaces the prompt, clamped to [`PROMPT_MAX_CHARS`].
    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = clamp_prompt(prompt);
    }

    /// Appends a tag to the prompt, comma-joined, only if not already
    /// present. Idempotent.
    pub fn append_tag(&mut self, tag: &str) {
        if self.prompt.contains(tag) {
            return;
        }
        let appended = if self.prompt.is_empty() {
            tag.to_string()
        } else {
            format!("{}, {}", self.prompt, tag)
        };
        self.prompt = clamp_prompt(&appended);
    }

    /// Selects a background preset by id.
    pub fn select_preset(&mut self, preset_id: &str) -> Result<()> {
        let preset = catalog::find_preset(preset_id).ok_or_else(|| {
            StudioError::InvalidInput(format!("unknown background preset: {preset_id}"))
        })?;
        self.options.background_preset = Some(preset.id.to_string());
        Ok(())
    }

    /// Selects a product category by id, storing its label for the
    /// instruction text.
    pub fn select_category(&mut self, category_id: &str) -> Result<()> {
        let category = catalog::find_category(category_id).ok_or_else(|| {
            StudioError::InvalidInput(format!("unknown product category: {category_id}"))
        })?;
        self.options.category = Some(category.label.to_string());
        Ok(())
    }

    /// Whether the primary action is enabled: nothing in flight, and every
    /// family except creative has an image selected.
    pub fn can_generate(&self) -> bool {
        !self.state.is_generating()
            && (self.tool.family == ToolFamily::Creative || self.source_image.is_some())
    }

    /// Validates the form and transitions to Generating, handing back the
    /// input to dispatch.
    ///
    /// Validation failures are blocking notices: they leave the current
    /// state untouched and never reach the request layer. A dispatch while
    /// one is already in flight is rejected with [`StudioError::Busy`].
    pub fn begin_generation(&mut self) -> Result<GenerationInput> {
        if self.state.is_generating() {
            return Err(StudioError::Busy);
        }
        let input = GenerationInput {
            source_image: self.source_image.clone(),
            prompt: self.prompt.clone(),
            options: self.options.clone(),
        };
        validate_input(self.tool.family, &input)?;
        self.state = GenerationState::Generating;
        Ok(input)
    }

    /// Applies a dispatch outcome to the state machine.
    ///
    /// Success stores a [`GenerationResult`] carrying the prompt the user
    /// submitted; failure stores the error message. Rejected if no
    /// generation is in progress (e.g. the tool was switched mid-flight).
    pub fn complete_generation(
        &mut self,
        outcome: Result<GeneratedImage>,
    ) -> Result<GenerationResult> {
        if !self.state.is_generating() {
            return Err(StudioError::InvalidInput(
                "no generation in progress".into(),
            ));
        }
        match outcome {
            Ok(image) => {
                let result = GenerationResult::new(image.to_encoded(), self.prompt.clone());
                self.state = GenerationState::Succeeded(result.clone());
                Ok(result)
            }
            Err(err) => {
                self.state = GenerationState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Dispatches the current form through `dispatcher` and records the
    /// outcome. Convenience over [`Self::begin_generation`] and
    /// [`Self::complete_generation`].
    pub async fn generate(&mut self, dispatcher: &Dispatcher) -> Result<GenerationResult> {
        let input = self.begin_generation()?;
        let outcome = dispatcher.generate_for_family(self.tool.family, &input).await;
        self.complete_generation(outcome)
    }
}

/// Fetches a sample image over HTTP and validates/encodes it exactly like an
/// upload.
pub async fn fetch_sample(client: &reqwest::Client, url: &str) -> Result<EncodedImage> {
    let response = client.get(url).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    EncodedImage::from_upload(&bytes)
}

fn clamp_prompt(prompt: &str) -> String {
    match prompt.char_indices().nth(PROMPT_MAX_CHARS) {
        Some((cut, _)) => prompt[..cut].to_string(),
        None => prompt.to_string(),
    }
}
