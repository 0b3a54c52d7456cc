use crate::client::{GenAiClient, IMAGE_MODEL, Transport};
use crate::error::GenAiError;
use crate::wire::{Content, GenerateContentRequest, GenerationConfig, ImageConfig};
use serde::{Deserialize, Serialize};

pub const ASPECT_RATIO: &str = "1:1";
const DEFAULT_MIME: &str = "image/png";

/// Requested output resolution tier.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    OneK,
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [ImageSize::OneK, ImageSize::TwoK, ImageSize::FourK];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::OneK => "1K",
            ImageSize::TwoK => "2K",
            ImageSize::FourK => "4K",
        }
    }
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImageSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown image size: {s}"))
    }
}

pub fn image_request(prompt: &str, size: ImageSize) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content::plain(prompt)],
        system_instruction: None,
        generation_config: Some(GenerationConfig {
            image_config: Some(ImageConfig {
                aspect_ratio: ASPECT_RATIO.to_string(),
                image_size: size.as_str().to_string(),
            }),
        }),
    }
}

/// Generates one square image. Returns a `data:` URI for the first inline
/// image part, or `None` when the model answered without one. Provider
/// failures propagate.
pub async fn generate_image<T: Transport>(
    client: &GenAiClient<T>,
    prompt: &str,
    size: ImageSize,
) -> Result<Option<String>, GenAiError> {
    let resp = client
        .generate(IMAGE_MODEL, &image_request(prompt, size))
        .await
        .inspect_err(|err| tracing::error!(%err, "image generation failed"))?;
    Ok(resp.first_inline_data().map(|data| {
        let mime = data.mime_type.as_deref().unwrap_or(DEFAULT_MIME);
        format!("data:{mime};base64,{}", data.data)
    }))
}
