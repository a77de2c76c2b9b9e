//! Per-tool-family generation strategies.
//!
//! Each family supplies its validation rules, instruction template and pinned
//! model behind one trait; response extraction is shared and lives with the
//! service client.

use crate::catalog::ToolFamily;
use crate::error::{Result, StudioError};
use crate::generate::gemini::GeminiModel;
use crate::generate::types::{GenerationInput, OutputConfig};

/// Action substituted when the variation prompt is left blank.
pub const DEFAULT_VARIATION_ACTION: &str = "Create a high quality variation of this image.";

/// A generation strategy for one tool family.
pub trait ToolStrategy: Send + Sync {
    /// The family this strategy serves.
    fn family(&self) -> ToolFamily;

    /// Model pinned for this family.
    fn model(&self) -> GeminiModel;

    /// Checks required inputs. Runs before any network attempt.
    fn validate(&self, input: &GenerationInput) -> Result<()>;

    /// Builds the instruction text sent to the service.
    fn instruction(&self, input: &GenerationInput) -> String;

    /// Whether the source image is attached to the request.
    fn sends_source_image(&self) -> bool {
        true
    }

    /// Fixed output configuration, if the family requests one.
    fn output_config(&self) -> Option<OutputConfig> {
        None
    }
}

/// Returns the strategy for a tool family.
pub fn strategy_for(family: ToolFamily) -> &'static dyn ToolStrategy {
    match family {
        ToolFamily::Variation => &Variation,
        ToolFamily::Creative => &Creative,
        ToolFamily::BackgroundSwap => &BackgroundSwap,
        ToolFamily::WatermarkRemoval => &WatermarkRemoval,
    }
}

fn require_image(input: &GenerationInput) -> Result<()> {
    if input.source_image.is_none() {
        return Err(StudioError::InvalidInput(
            "a source image is required for this tool".into(),
        ));
    }
    Ok(())
}

/// Image-to-image variation: keep clothing and style, vary pose/action.
struct Variation;

impl ToolStrategy for Variation {
    fn family(&self) -> ToolFamily {
        ToolFamily::Variation
    }

    fn model(&self) -> GeminiModel {
        GeminiModel::FlashImage
    }

    fn validate(&self, input: &GenerationInput) -> Result<()> {
        require_image(input)
    }

    fn instruction(&self, input: &GenerationInput) -> String {
        let action = if input.prompt.trim().is_empty() {
            DEFAULT_VARIATION_ACTION
        } else {
            input.prompt.as_str()
        };
        format!(
            "You are an expert fashion photographer and editor.\n\
             Task: Generate a new fashion image based on the provided reference image.\n\
             Instructions:\n\
             1. Analyze the reference image's model, clothing, and style.\n\
             2. Create a NEW variation where the model performs this action/pose: \"{action}\".\n\
             3. Keep the clothing appearance as consistent as possible with the reference.\n\
             4. Maintain the same lighting mood and background style.\n\
             5. Return a high-quality photorealistic image."
        )
    }
}

/// Text-to-image creation. No source image; fixed 1K / 3:4 output.
struct Creative;

impl ToolStrategy for Creative {
    fn family(&self) -> ToolFamily {
        ToolFamily::Creative
    }

    fn model(&self) -> GeminiModel {
        GeminiModel::ProImagePreview
    }

    fn validate(&self, input: &GenerationInput) -> Result<()> {
        if input.prompt.trim().is_empty() {
            return Err(StudioError::InvalidInput(
                "a prompt is required for creative generation".into(),
            ));
        }
        Ok(())
    }

    fn instruction(&self, input: &GenerationInput) -> String {
        input.prompt.clone()
    }

    fn sends_source_image(&self) -> bool {
        false
    }

    fn output_config(&self) -> Option<OutputConfig> {
        Some(OutputConfig {
            image_size: "1K",
            aspect_ratio: "3:4",
        })
    }
}

/// Place a product into a new scene, preserving the product exactly.
struct BackgroundSwap;

impl ToolStrategy for BackgroundSwap {
    fn family(&self) -> ToolFamily {
        ToolFamily::BackgroundSwap
    }

    fn model(&self) -> GeminiModel {
        GeminiModel::FlashImage
    }

    fn validate(&self, input: &GenerationInput) -> Result<()> {
        require_image(input)?;
        if input.prompt.trim().is_empty() {
            return Err(StudioError::InvalidInput(
                "a background description is required".into(),
            ));
        }
        Ok(())
    }

    fn instruction(&self, input: &GenerationInput) -> String {
        let category_context = match input.options.category.as_deref() {
            Some(category) => format!("The object is a {category}."),
            None => String::new(),
        };
        let scene = &input.prompt;
        format!(
            "You are an expert product photographer.\n\
             Task: Create a realistic product photo using the provided object.\n\
             Context: {category_context}\n\
             Instructions:\n\
             1. Place the object from the reference image into the following scene: \"{scene}\".\n\
             2. Ensure the object blends naturally with the background (shadows, reflections, lighting matching).\n\
             3. Do NOT distort the product itself. Keep its details, logo, and shape exactly as is.\n\
             4. If the background prompt implies a surface (table, floor), ensure the product sits on it correctly with contact shadows.\n\
             5. Return a high-quality, photorealistic image."
        )
    }
}

/// Remove watermarks and overlaid text; the prompt field is unused.
struct WatermarkRemoval;

impl ToolStrategy for WatermarkRemoval {
    fn family(&self) -> ToolFamily {
        ToolFamily::WatermarkRemoval
    }

    fn model(&self) -> GeminiModel {
        GeminiModel::FlashImage
    }

    fn validate(&self, input: &GenerationInput) -> Result<()> {
        require_image(input)
    }

    fn instruction(&self, _input: &GenerationInput) -> String {
        "Task: Remove all watermarks, text, logos, and overlaid graphics from this image.\n\
         Instructions:\n\
         1. Identify any text, logos, or semi-transparent watermarks overlaying the main content.\n\
         2. Remove them completely.\n\
         3. Inpaint the removed areas to match the surrounding texture, lighting, and background seamlessly.\n\
         4. Do not alter the main subject or the overall composition aside from cleaning the overlay.\n\
         5. Return the clean high-quality image."
            .to_string()
    }
}
