//! Image payloads and reference-image ingestion.
//!
//! [`ImagePart`] is the encoded image unit exchanged with the image service.
//! [`UploadSet`] holds the user's reference images in upload order; a new
//! upload batch replaces it wholesale, and only when every file in the batch
//! decoded.

use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A base64 encoded image with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePart {
    /// Base64 payload (standard alphabet, padded).
    pub data: String,
    /// MIME type such as `image/png`.
    pub mime_type: String,
}

impl ImagePart {
    /// Create a part from an already encoded payload.
    #[must_use]
    pub fn new(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Encode raw bytes into a part.
    #[must_use]
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self::new(BASE64.encode(bytes), mime_type)
    }

    /// Decode the payload back into bytes.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(&self.data)
    }

    /// Render the part as a `data:` URL, the form a browser preview uses.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Approximate decoded size in bytes.
    #[must_use]
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }
}

/// A user-selected file awaiting ingestion.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name as selected by the user.
    pub name: String,
    /// Declared MIME type, if the source supplied one.
    pub mime_type: Option<String>,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Create an upload from in-memory bytes.
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            bytes,
        }
    }

    /// Set the declared MIME type.
    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Resolve the MIME type: declared first, then guessed from the name.
    #[must_use]
    pub fn resolved_mime_type(&self) -> Option<String> {
        self.mime_type.clone().or_else(|| {
            mime_guess::from_path(&self.name)
                .first()
                .map(|m| m.essence_str().to_owned())
        })
    }

    /// Encode this file, rejecting anything not typed as an image.
    pub fn into_part(self) -> std::result::Result<ImagePart, String> {
        match self.resolved_mime_type() {
            Some(mime) if mime.starts_with("image/") => Ok(ImagePart::from_bytes(&self.bytes, mime)),
            Some(mime) => Err(format!("{}: not an image ({mime})", self.name)),
            None => Err(format!("{}: unknown media type", self.name)),
        }
    }
}

/// Read a file from disk into an [`UploadFile`].
pub async fn read_upload(path: impl AsRef<Path>) -> std::io::Result<UploadFile> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
    Ok(UploadFile::new(name, bytes))
}

/// Decode a batch of files, all or nothing.
///
/// Every failure is logged; a single aggregate [`Error::Upload`] is returned
/// if any file could not be turned into an image part.
pub fn decode_batch(files: Vec<UploadFile>) -> Result<Vec<ImagePart>> {
    let total = files.len();
    let mut parts = Vec::with_capacity(total);
    let mut failed = 0;

    for file in files {
        match file.into_part() {
            Ok(part) => parts.push(part),
            Err(reason) => {
                tracing::error!(%reason, "failed to decode upload");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(Error::Upload { failed, total });
    }
    Ok(parts)
}

/// Read and decode files from disk concurrently, all or nothing.
pub async fn ingest_paths(paths: &[PathBuf]) -> Result<Vec<ImagePart>> {
    let total = paths.len();
    let reads = join_all(paths.iter().map(read_upload)).await;

    let mut files = Vec::with_capacity(total);
    let mut failed = 0;
    for (path, read) in paths.iter().zip(reads) {
        match read {
            Ok(file) => files.push(file),
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "failed to read upload");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(Error::Upload { failed, total });
    }
    decode_batch(files)
}

/// Preview descriptor for one uploaded image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    /// Position in the upload set.
    pub index: usize,
    /// Accessible label, e.g. "Uploaded car image 1".
    pub label: String,
    /// Label of the remove control, e.g. "Remove image 1".
    pub remove_label: String,
    /// MIME type of the image.
    pub mime_type: String,
    /// Decoded size in bytes.
    pub size: usize,
}

/// Ordered reference images; insertion order is upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSet {
    images: Vec<ImagePart>,
}

impl UploadSet {
    /// Create an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { images: Vec::new() }
    }

    /// Replace the whole set with a freshly decoded batch.
    pub fn replace(&mut self, images: Vec<ImagePart>) {
        self.images = images;
    }

    /// Remove the image at `index`.
    pub fn remove(&mut self, index: usize) -> Result<ImagePart> {
        if index >= self.images.len() {
            return Err(Error::InvalidIndex {
                what: "image",
                index,
            });
        }
        Ok(self.images.remove(index))
    }

    /// The first image, shown when nothing has been generated.
    #[must_use]
    pub fn first(&self) -> Option<&ImagePart> {
        self.images.first()
    }

    /// All images in upload order.
    #[must_use]
    pub fn as_slice(&self) -> &[ImagePart] {
        &self.images
    }

    /// Number of images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Preview descriptors, one per image.
    #[must_use]
    pub fn previews(&self) -> Vec<Preview> {
        self.images
            .iter()
            .enumerate()
            .map(|(index, img)| Preview {
                index,
                label: format!("Uploaded car image {}", index + 1),
                remove_label: format!("Remove image {}", index + 1),
                mime_type: img.mime_type.clone(),
                size: img.decoded_len(),
            })
            .collect()
    }
}
