//! Gemini (Google) generation service client.

use crate::error::{sanitize_error_message, Result, StudioError};
use crate::generate::service::{GenerationService, ServiceRequest};
use crate::generate::types::{GeneratedImage, ImageFormat};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Environment variable holding the API key.
pub const API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// Gemini image model variants used by the toolbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.5 Flash Image — fast image-to-image editing.
    #[default]
    FlashImage,
    /// Gemini 3 Pro Image — highest quality text-to-image.
    ProImagePreview,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImage => "gemini-2.5-flash-image",
            Self::ProImagePreview => "gemini-3-pro-image-preview",
        }
    }
}

/// Builder for [`GeminiClient`].
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an explicit API key, bypassing the `GOOGLE_API_KEY` env var.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Overrides the API base URL (tests).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the client. The API key is not resolved here — it is read at
    /// dispatch time so a missing credential fails each generation call
    /// before any network attempt.
    pub fn build(self) -> GeminiClient {
        GeminiClient {
            client: reqwest::Client::new(),
            api_key: self.api_key,
            base_url: self
                .base_url
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string()),
        }
    }
}

/// Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GeminiClient {
    /// Creates a new [`GeminiClientBuilder`].
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    fn resolve_api_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_VAR).ok())
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                StudioError::Auth(format!("{API_KEY_VAR} not set and no API key provided"))
            })
    }

    async fn generate_impl(&self, request: &ServiceRequest) -> Result<GeneratedImage> {
        // Credential is read per call; absence fails before any I/O.
        let api_key = self.resolve_api_key()?;
        let start = Instant::now();

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url,
            request.model.as_str(),
        );

        let body = GeminiRequest::from_service_request(request);
        tracing::debug!(model = request.model.as_str(), "dispatching generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let (data, format) = extract_image(gemini_response)?;

        Ok(GeneratedImage {
            data,
            format,
            model: Some(request.model.as_str().to_string()),
            duration_ms: Some(start.elapsed().as_millis() as u64),
        })
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    async fn generate(&self, request: &ServiceRequest) -> Result<GeneratedImage> {
        self.generate_impl(request).await
    }
}

/// Maps a non-2xx response to a typed error.
fn parse_error(status: u16, text: &str) -> StudioError {
    let text = sanitize_error_message(text);
    if status == 429 {
        return StudioError::RateLimited;
    }
    if status == 401 || status == 403 {
        return StudioError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("safety")
        || lower.contains("blocked")
        || lower.contains("content_policy")
        || lower.contains("prohibited")
    {
        return StudioError::ContentBlocked(text);
    }
    StudioError::Api {
        status,
        message: text,
    }
}

/// Extracts the first inline image from a response.
///
/// Shared across all tool families. A response without an inline image part
/// is a failure, never an empty success.
fn extract_image(response: GeminiResponse) -> Result<(Vec<u8>, ImageFormat)> {
    // Blocked prompts come back as HTTP 200 with feedback attached.
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let msg = feedback
                .block_reason_message
                .unwrap_or_else(|| format!("prompt blocked: {reason}"));
            return Err(StudioError::ContentBlocked(msg));
        }
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(StudioError::NoImage)?;

    if let Some(ref finish_reason) = candidate.finish_reason {
        match finish_reason.as_str() {
            "SAFETY" | "IMAGE_SAFETY" | "IMAGE_PROHIBITED_CONTENT" | "RECITATION"
            | "PROHIBITED_CONTENT" | "BLOCKLIST" => {
                return Err(StudioError::ContentBlocked(format!(
                    "content blocked by safety filter: {finish_reason}"
                )));
            }
            _ => {} // STOP, MAX_TOKENS, etc. are normal
        }
    }

    let inline_data = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .find_map(|part| part.inline_data)
        .ok_or(StudioError::NoImage)?;

    let data = base64::engine::general_purpose::STANDARD
        .decode(&inline_data.data)
        .map_err(|e| StudioError::Decode(e.to_string()))?;

    let format = match inline_data.mime_type.as_str() {
        "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
        "image/webp" => ImageFormat::WebP,
        _ => ImageFormat::Png,
    };

    Ok((data, format))
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a request - instruction text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    response_modalities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<GeminiImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiImageConfig {
    image_size: String,
    aspect_ratio: String,
}

impl GeminiRequest {
    fn from_service_request(request: &ServiceRequest) -> Self {
        let mut parts = vec![GeminiRequestPart::Text {
            text: request.instruction.clone(),
        }];

        if let Some(ref image) = request.image {
            parts.push(GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            });
        }

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiGenerationConfig {
                response_modalities: vec!["IMAGE".to_string()],
                image_config: request.output.map(|output| GeminiImageConfig {
                    image_size: output.image_size.to_string(),
                    aspect_ratio: output.aspect_ratio.to_string(),
                }),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::service::InlineImage;
    use crate::generate::types::OutputConfig;

    fn service_request() -> ServiceRequest {
        ServiceRequest {
            model: GeminiModel::FlashImage,
            instruction: "vary the pose".into(),
            image: None,
            output: None,
        }
    }

    #[test]
    fn test_model_as_str() {
        assert_eq!(GeminiModel::FlashImage.as_str(), "gemini-2.5-flash-image");
        assert_eq!(
            GeminiModel::ProImagePreview.as_str(),
            "gemini-3-pro-image-preview"
        );
    }

    #[test]
    fn test_request_text_only() {
        let req = GeminiRequest::from_service_request(&service_request());
        assert_eq!(req.contents.len(), 1);
        assert_eq!(req.contents[0].parts.len(), 1);
        assert_eq!(
            req.generation_config.response_modalities,
            vec!["IMAGE".to_string()]
        );
        assert!(req.generation_config.image_config.is_none());
    }

    #[test]
    fn test_request_with_inline_image() {
        let mut request = service_request();
        request.image = Some(InlineImage {
            mime_type: "image/webp".into(),
            data: "AQID".into(),
        });
        let req = GeminiRequest::from_service_request(&request);

        // Instruction text first, then the image payload.
        assert_eq!(req.contents[0].parts.len(), 2);
        let json = serde_json::to_value(&req).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], "vary the pose");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/webp");
        assert_eq!(parts[1]["inlineData"]["data"], "AQID");
    }

    #[test]
    fn test_request_serialization_uses_camel_case() {
        let mut request = service_request();
        request.output = Some(OutputConfig {
            image_size: "1K",
            aspect_ratio: "3:4",
        });
        let req = GeminiRequest::from_service_request(&request);
        let json = serde_json::to_value(&req).unwrap();

        assert!(json.get("generationConfig").is_some());
        assert!(json.get("generation_config").is_none());
        let image_config = &json["generationConfig"]["imageConfig"];
        assert_eq!(image_config["imageSize"], "1K");
        assert_eq!(image_config["aspectRatio"], "3:4");
    }

    #[test]
    fn test_extract_first_inline_image_wins() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {},
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "BBBB"}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let (data, format) = extract_image(response).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_extract_no_inline_image_is_failure() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{}]}
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_image(response).unwrap_err(),
            StudioError::NoImage
        ));
    }

    #[test]
    fn test_extract_empty_candidates_is_failure() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates": []}"#).unwrap();
        assert!(matches!(
            extract_image(response).unwrap_err(),
            StudioError::NoImage
        ));
    }

    #[test]
    fn test_extract_prompt_feedback_block() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {
                "blockReason": "SAFETY",
                "blockReasonMessage": "Prompt was blocked due to safety"
            }
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        match extract_image(response).unwrap_err() {
            StudioError::ContentBlocked(msg) => {
                assert_eq!(msg, "Prompt was blocked due to safety")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_extract_safety_finish_reason() {
        let json = r#"{
            "candidates": [{"finishReason": "IMAGE_SAFETY"}]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            extract_image(response).unwrap_err(),
            StudioError::ContentBlocked(_)
        ));
    }

    #[test]
    fn test_extract_unknown_mime_defaults_to_png() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [{"inlineData": {"mimeType": "application/octet-stream", "data": "AQID"}}]
                }
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        let (_, format) = extract_image(response).unwrap();
        assert_eq!(format, ImageFormat::Png);
    }

    #[test]
    fn test_parse_error_mapping() {
        assert!(matches!(parse_error(429, "slow down"), StudioError::RateLimited));
        assert!(matches!(parse_error(401, "bad key"), StudioError::Auth(_)));
        assert!(matches!(parse_error(403, "forbidden"), StudioError::Auth(_)));
        assert!(matches!(
            parse_error(400, "request blocked by safety system"),
            StudioError::ContentBlocked(_)
        ));
        assert!(matches!(
            parse_error(500, "boom"),
            StudioError::Api { status: 500, .. }
        ));
    }
}
