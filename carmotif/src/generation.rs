//! Content generation types and the provider trait.
//!
//! This module provides:
//! - [`GenerateRequest`]: images plus a text prompt and requested modalities
//! - [`GenerateResponse`]: the ordered parts a model returned
//! - [`ContentGenerator`]: the trait image/text backends implement
//!
//! # Example
//!
//! ```rust,ignore
//! use carmotif::prelude::*;
//!
//! let request = GenerateRequest::new("gemini-2.5-flash-image-preview")
//!     .images(uploads.as_slice())
//!     .text("Set the car in Tokyo.")
//!     .modalities([Modality::Image, Modality::Text]);
//!
//! let response = generator.generate(&request).await?;
//! let image = response.first_image();
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::image::ImagePart;

/// Output modality requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    /// Inline image output.
    Image,
    /// Text output.
    Text,
}

impl Modality {
    /// Wire name of the modality.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "IMAGE",
            Self::Text => "TEXT",
        }
    }
}

/// One ordered content part of a request or response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Text content.
    Text(String),
    /// Inline image content.
    Image(ImagePart),
}

impl Part {
    /// Text of this part, if any.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Image(_) => None,
        }
    }

    /// Image of this part, if any.
    #[must_use]
    pub const fn as_image(&self) -> Option<&ImagePart> {
        match self {
            Self::Image(image) => Some(image),
            Self::Text(_) => None,
        }
    }
}

/// A content generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Model identifier; empty selects the provider default.
    pub model: String,
    /// Ordered content parts; prompts put the text last.
    pub parts: Vec<Part>,
    /// Modalities requested in the response; empty means provider default.
    pub modalities: Vec<Modality>,
}

impl GenerateRequest {
    /// Creates a new request for the given model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Appends one image part.
    #[must_use]
    pub fn image(mut self, image: ImagePart) -> Self {
        self.parts.push(Part::Image(image));
        self
    }

    /// Appends image parts in order.
    #[must_use]
    pub fn images<'a>(mut self, images: impl IntoIterator<Item = &'a ImagePart>) -> Self {
        self.parts
            .extend(images.into_iter().cloned().map(Part::Image));
        self
    }

    /// Appends a text part.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }

    /// Sets the requested response modalities.
    #[must_use]
    pub fn modalities(mut self, modalities: impl IntoIterator<Item = Modality>) -> Self {
        self.modalities = modalities.into_iter().collect();
        self
    }

    /// Number of image parts.
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.parts.iter().filter(|p| p.as_image().is_some()).count()
    }
}

/// A content generation response: the parts of the first candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    /// Ordered parts; images and text may appear in any order.
    pub parts: Vec<Part>,
}

impl GenerateResponse {
    /// Creates a response from parts.
    #[must_use]
    pub const fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// The first inline image, if any.
    #[must_use]
    pub fn first_image(&self) -> Option<&ImagePart> {
        self.parts.iter().find_map(Part::as_image)
    }

    /// The first text part, if any.
    #[must_use]
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(Part::as_text)
    }

    /// All text parts concatenated.
    #[must_use]
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }

    /// Split into the first image and the first text.
    #[must_use]
    pub fn into_image_and_text(self) -> (Option<ImagePart>, Option<String>) {
        let mut image = None;
        let mut text = None;
        for part in self.parts {
            match part {
                Part::Image(img) if image.is_none() => image = Some(img),
                Part::Text(t) if text.is_none() => text = Some(t),
                _ => {}
            }
        }
        (image, text)
    }
}

/// Trait for backends that generate multimodal content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Send a generation request and receive the complete response.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;

    /// Get the name of this provider.
    ///
    /// Used for error messages and logging.
    fn provider_name(&self) -> &'static str;
}

/// Extension trait for `ContentGenerator` with convenience methods.
#[async_trait]
pub trait ContentGeneratorExt: ContentGenerator {
    /// Send a text-only prompt and return the concatenated text reply.
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let request = GenerateRequest::new(model).text(prompt);
        let response = self.generate(&request).await?;
        Ok(response.text())
    }
}

impl<T: ContentGenerator + ?Sized> ContentGeneratorExt for T {}

/// Type alias for an Arc-wrapped `ContentGenerator`.
pub type SharedContentGenerator = std::sync::Arc<dyn ContentGenerator>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn img(tag: &str) -> ImagePart {
        ImagePart::from_bytes(tag.as_bytes(), "image/png")
    }

    mod request {
        use super::*;

        #[test]
        fn images_then_text() {
            let uploads = [img("a"), img("b")];
            let req = GenerateRequest::new("m")
                .images(&uploads)
                .text("prompt")
                .modalities([Modality::Image, Modality::Text]);

            assert_eq!(req.parts.len(), 3);
            assert_eq!(req.image_count(), 2);
            assert_eq!(req.parts[2].as_text(), Some("prompt"));
            assert_eq!(req.modalities, vec![Modality::Image, Modality::Text]);
        }

        #[test]
        fn modality_wire_names() {
            assert_eq!(Modality::Image.as_str(), "IMAGE");
            assert_eq!(serde_json::to_value(Modality::Text).unwrap(), "TEXT");
        }
    }

    mod response {
        use super::*;

        #[test]
        fn first_image_and_text_any_order() {
            let resp = GenerateResponse::new(vec![
                Part::Text("story".into()),
                Part::Image(img("x")),
                Part::Text("more".into()),
                Part::Image(img("y")),
            ]);
            assert_eq!(resp.first_image(), Some(&img("x")));
            assert_eq!(resp.first_text(), Some("story"));
            assert_eq!(resp.text(), "storymore");

            let (image, text) = resp.into_image_and_text();
            assert_eq!(image, Some(img("x")));
            assert_eq!(text.as_deref(), Some("story"));
        }

        #[test]
        fn no_image() {
            let resp = GenerateResponse::new(vec![Part::Text("only text".into())]);
            assert!(resp.first_image().is_none());
        }

        #[test]
        fn empty() {
            let resp = GenerateResponse::default();
            assert!(resp.first_text().is_none());
            assert_eq!(resp.text(), "");
        }
    }
}
