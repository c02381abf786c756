//! Playable narration audio.
//!
//! An [`AudioSlot`] owns at most one [`AudioClip`]. Assigning a new clip
//! releases the previous one first, so superseded narration never piles up.

use std::sync::Arc;

use tracing::debug;

use crate::speech::SpeechResponse;

/// A synthesized narration clip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    id: u64,
    mime_type: String,
    data: Arc<[u8]>,
}

impl AudioClip {
    /// Slot-unique identifier of this clip.
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// MIME type of the audio.
    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Raw audio bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the clip holds no audio.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Conventional file extension for the clip's MIME type.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        mime_guess::get_mime_extensions_str(&self.mime_type)
            .and_then(|exts| exts.iter().find(|e| **e == "mp3").or_else(|| exts.first()))
            .copied()
            .unwrap_or("bin")
    }
}

/// Holder of the current narration clip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioSlot {
    current: Option<AudioClip>,
    next_id: u64,
    released: u64,
}

impl AudioSlot {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            next_id: 0,
            released: 0,
        }
    }

    /// Current clip, if any.
    #[must_use]
    pub const fn current(&self) -> Option<&AudioClip> {
        self.current.as_ref()
    }

    /// Whether a clip is loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Number of clips released so far.
    #[must_use]
    pub const fn released(&self) -> u64 {
        self.released
    }

    /// Release the previous clip and load a new one.
    pub fn assign(&mut self, speech: SpeechResponse) -> &AudioClip {
        self.release();
        self.next_id += 1;
        let clip = AudioClip {
            id: self.next_id,
            mime_type: speech.mime_type,
            data: speech.audio.into(),
        };
        debug!(id = clip.id, bytes = clip.len(), "Loaded narration clip");
        self.current.insert(clip)
    }

    /// Release the current clip, if any.
    pub fn release(&mut self) {
        if let Some(clip) = self.current.take() {
            self.released += 1;
            debug!(id = clip.id, bytes = clip.len(), "Released narration clip");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn speech(bytes: &[u8]) -> SpeechResponse {
        SpeechResponse::new(bytes.to_vec(), "audio/mpeg")
    }

    #[test]
    fn assign_releases_previous() {
        let mut slot = AudioSlot::new();
        let first = slot.assign(speech(b"one")).id();
        let second = slot.assign(speech(b"two")).id();

        assert_ne!(first, second);
        assert_eq!(slot.released(), 1);
        assert_eq!(slot.current().unwrap().bytes(), b"two");
    }

    #[test]
    fn release_empty_slot_is_noop() {
        let mut slot = AudioSlot::new();
        slot.release();
        assert_eq!(slot.released(), 0);
        assert!(!slot.is_loaded());
    }

    #[test]
    fn release_clears_clip() {
        let mut slot = AudioSlot::new();
        slot.assign(speech(b"x"));
        slot.release();
        assert!(slot.current().is_none());
        assert_eq!(slot.released(), 1);
    }

    #[test]
    fn mpeg_extension() {
        let mut slot = AudioSlot::new();
        let clip = slot.assign(speech(b"x"));
        assert_eq!(clip.extension(), "mp3");
        assert_eq!(clip.mime_type(), "audio/mpeg");
    }
}
