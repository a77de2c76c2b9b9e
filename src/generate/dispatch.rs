//! Generation request dispatcher.
//!
//! Given a tool id and user inputs, selects the family strategy, validates,
//! builds the service request and normalizes the outcome to a single image
//! or a descriptive failure.

use crate::catalog::{self, ToolFamily, CUSTOM_PRESET_ID};
use crate::error::{Result, StudioError};
use crate::generate::gemini::GeminiClient;
use crate::generate::service::{GenerationService, InlineImage, ServiceRequest};
use crate::generate::strategy::strategy_for;
use crate::generate::types::{GeneratedImage, GenerationInput};

/// Dispatches generation requests to the external service.
pub struct Dispatcher {
    service: Box<dyn GenerationService>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Creates a dispatcher backed by the Gemini client.
    pub fn new() -> Self {
        Self::with_service(Box::new(GeminiClient::default()))
    }

    /// Creates a dispatcher over a custom service implementation.
    pub fn with_service(service: Box<dyn GenerationService>) -> Self {
        Self { service }
    }

    /// Dispatches for a tool id from the catalog.
    pub async fn generate(&self, tool_id: &str, input: &GenerationInput) -> Result<GeneratedImage> {
        let tool = catalog::find_tool(tool_id)
            .ok_or_else(|| StudioError::InvalidInput(format!("unknown tool: {tool_id}")))?;
        self.generate_for_family(tool.family, input).await
    }

    /// Dispatches for a tool family directly.
    pub async fn generate_for_family(
        &self,
        family: ToolFamily,
        input: &GenerationInput,
    ) -> Result<GeneratedImage> {
        let input = resolve_preset(family, input)?;
        let strategy = strategy_for(family);
        strategy.validate(&input)?;

        let image = if strategy.sends_source_image() {
            // Strip the data-URL envelope; the service takes raw base64 plus
            // the media type re-derived from the prefix.
            input.source_image.as_ref().map(|source| InlineImage {
                mime_type: source.media_type().mime_type().to_string(),
                data: source.payload().to_string(),
            })
        } else {
            None
        };

        let request = ServiceRequest {
            model: strategy.model(),
            instruction: strategy.instruction(&input),
            image,
            output: strategy.output_config(),
        };

        tracing::debug!(family = ?family, model = request.model.as_str(), "dispatching generation");
        self.service.generate(&request).await
    }
}

/// The dispatcher's required-inputs predicate, exposed so the form can
/// surface validation failures as blocking notices without transitioning
/// its state machine.
pub fn validate_input(family: ToolFamily, input: &GenerationInput) -> Result<()> {
    let resolved = resolve_preset(family, input)?;
    strategy_for(family).validate(&resolved)
}

/// Applies background-preset derivation for the background-swap family.
///
/// A non-custom preset overwrites the prompt with its fixed template,
/// regardless of any text the user typed earlier; the custom preset defers
/// to user text.
fn resolve_preset(family: ToolFamily, input: &GenerationInput) -> Result<GenerationInput> {
    let mut resolved = input.clone();
    if family != ToolFamily::BackgroundSwap {
        return Ok(resolved);
    }
    if let Some(ref preset_id) = input.options.background_preset {
        let preset = catalog::find_preset(preset_id).ok_or_else(|| {
            StudioError::InvalidInput(format!("unknown background preset: {preset_id}"))
        })?;
        if preset.id != CUSTOM_PRESET_ID {
            resolved.prompt = preset.prompt.to_string();
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::strategy::DEFAULT_VARIATION_ACTION;
    use crate::generate::types::{EncodedImage, ImageFormat, ToolOptions};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted service: records requests, replays a canned outcome.
    struct ScriptedService {
        outcome: Mutex<Option<Result<GeneratedImage>>>,
        seen: Mutex<Vec<ServiceRequest>>,
    }

    impl ScriptedService {
        fn returning(outcome: Result<GeneratedImage>) -> Self {
            Self {
                outcome: Mutex::new(Some(outcome)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn ok() -> Self {
            Self::returning(Ok(GeneratedImage {
                data: vec![1, 2, 3],
                format: ImageFormat::Png,
                model: None,
                duration_ms: None,
            }))
        }
    }

    #[async_trait]
    impl GenerationService for &ScriptedService {
        async fn generate(&self, request: &ServiceRequest) -> Result<GeneratedImage> {
            self.seen.lock().unwrap().push(request.clone());
            self.outcome
                .lock()
                .unwrap()
                .take()
                .expect("service invoked more than scripted")
        }
    }

    fn dispatcher(service: &'static ScriptedService) -> Dispatcher {
        Dispatcher::with_service(Box::new(service))
    }

    fn leaked_ok_service() -> &'static ScriptedService {
        Box::leak(Box::new(ScriptedService::ok()))
    }

    fn webp_image() -> EncodedImage {
        EncodedImage::from_bytes(&[1, 2, 3], ImageFormat::WebP)
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_before_service() {
        let service = leaked_ok_service();
        let err = dispatcher(service)
            .generate("no-such-tool", &GenerationInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::InvalidInput(_)));
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_service() {
        let service = leaked_ok_service();
        for tool_id in ["fission", "bg-swap-product", "remove-watermark"] {
            let err = dispatcher(service)
                .generate(tool_id, &GenerationInput::default())
                .await
                .unwrap_err();
            assert!(matches!(err, StudioError::InvalidInput(_)), "{tool_id}");
        }
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_envelope_stripped_and_media_type_rederived() {
        let service = leaked_ok_service();
        let input = GenerationInput::from_image(webp_image());
        dispatcher(service).generate("fission", &input).await.unwrap();

        let seen = service.seen.lock().unwrap();
        let image = seen[0].image.as_ref().unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.data, "AQID");
        assert!(!image.data.contains("base64"));
    }

    #[tokio::test]
    async fn test_blank_variation_prompt_substitutes_default() {
        let service = leaked_ok_service();
        let input = GenerationInput::from_image(webp_image());
        dispatcher(service).generate("fission", &input).await.unwrap();

        let seen = service.seen.lock().unwrap();
        assert!(seen[0].instruction.contains(DEFAULT_VARIATION_ACTION));
        assert_eq!(seen[0].model.as_str(), "gemini-2.5-flash-image");
    }

    #[tokio::test]
    async fn test_creative_sends_no_image_and_pins_output() {
        let service = leaked_ok_service();
        let mut input = GenerationInput::from_prompt("a lighthouse at dawn");
        // Even a stray selected image is not attached for the creative family.
        input.source_image = Some(webp_image());
        dispatcher(service).generate("creative", &input).await.unwrap();

        let seen = service.seen.lock().unwrap();
        assert!(seen[0].image.is_none());
        assert_eq!(seen[0].model.as_str(), "gemini-3-pro-image-preview");
        let output = seen[0].output.unwrap();
        assert_eq!((output.image_size, output.aspect_ratio), ("1K", "3:4"));
    }

    #[tokio::test]
    async fn test_creative_empty_prompt_fails_validation() {
        let service = leaked_ok_service();
        let err = dispatcher(service)
            .generate("creative", &GenerationInput::from_prompt(""))
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::InvalidInput(_)));
        assert!(service.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_preset_overrides_typed_prompt() {
        let service = leaked_ok_service();
        let mut input = GenerationInput::from_image(webp_image());
        input.prompt = "leftover custom text".into();
        input.options = ToolOptions {
            background_preset: Some("marble-table".into()),
            category: Some("handbag".into()),
        };
        dispatcher(service)
            .generate("bg-swap-product", &input)
            .await
            .unwrap();

        let seen = service.seen.lock().unwrap();
        assert!(seen[0]
            .instruction
            .contains("a polished marble tabletop with soft window light from the left"));
        assert!(!seen[0].instruction.contains("leftover custom text"));
        assert!(seen[0].instruction.contains("The object is a handbag."));
    }

    #[tokio::test]
    async fn test_custom_preset_requires_prompt() {
        let service = leaked_ok_service();
        let mut input = GenerationInput::from_image(webp_image());
        input.options.background_preset = Some(CUSTOM_PRESET_ID.into());

        let err = dispatcher(service)
            .generate("bg-swap-product", &input)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::InvalidInput(_)));
        assert!(service.seen.lock().unwrap().is_empty());

        input.prompt = "floating in a koi pond".into();
        dispatcher(service)
            .generate("bg-swap-product", &input)
            .await
            .unwrap();
        let seen = service.seen.lock().unwrap();
        assert!(seen[0].instruction.contains("floating in a koi pond"));
    }

    #[tokio::test]
    async fn test_unknown_preset_fails_validation() {
        let service = leaked_ok_service();
        let mut input = GenerationInput::from_image(webp_image());
        input.options.background_preset = Some("volcano".into());
        let err = dispatcher(service)
            .generate("bg-swap-product", &input)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_watermark_removal_needs_no_prompt() {
        let service = leaked_ok_service();
        let input = GenerationInput::from_image(webp_image());
        dispatcher(service)
            .generate("remove-watermark", &input)
            .await
            .unwrap();

        let seen = service.seen.lock().unwrap();
        assert!(seen[0].instruction.contains("Remove all watermarks"));
        assert!(seen[0].image.is_some());
    }

    #[tokio::test]
    async fn test_service_failure_propagates() {
        let service: &'static ScriptedService =
            Box::leak(Box::new(ScriptedService::returning(Err(StudioError::NoImage))));
        let input = GenerationInput::from_image(webp_image());
        let err = dispatcher(service)
            .generate("fission", &input)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::NoImage));
    }
}
