//! Scripted providers for testing.
//!
//! [`MockGenerator`] and [`MockSynthesizer`] answer from a predefined script
//! and record every request they receive, so studio flows can be exercised
//! without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use carmotif::providers::mock::{MockGenerator, MockSynthesizer};
//!
//! let generator = MockGenerator::new(vec![Ok(GenerateResponse::new(vec![
//!     Part::Image(ImagePart::from_bytes(b"png", "image/png")),
//!     Part::Text("A neon night in Tokyo.".into()),
//! ]))]);
//! let speech = MockSynthesizer::new(vec![Err(ProviderError::auth("mock", "Status: 401."))]);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::{ProviderError, Result};
use crate::generation::{ContentGenerator, GenerateRequest, GenerateResponse};
use crate::speech::{SpeechRequest, SpeechResponse, SpeechSynthesizer};

/// Scripted reply of a mock provider.
pub type MockReply<T> = std::result::Result<T, ProviderError>;

type Responder = dyn Fn(&GenerateRequest, usize) -> MockReply<GenerateResponse> + Send + Sync;

/// A scripted content generator.
///
/// Replies come either from a list, cycled in call order, or from a closure
/// that sees the request and the call index.
pub struct MockGenerator {
    responder: Box<Responder>,
    calls: AtomicUsize,
    requests: Mutex<Vec<GenerateRequest>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockGenerator {
    /// Create a generator that cycles through `replies`.
    #[must_use]
    pub fn new(replies: Vec<MockReply<GenerateResponse>>) -> Self {
        Self::from_fn(move |_, index| {
            if replies.is_empty() {
                return Ok(GenerateResponse::default());
            }
            replies[index % replies.len()].clone()
        })
    }

    /// Create a generator answering through `f(request, call_index)`.
    #[must_use]
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&GenerateRequest, usize) -> MockReply<GenerateResponse> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(f),
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold every call until a permit is added to `gate`.
    #[must_use]
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for MockGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockGenerator")
            .field("calls", &self.calls())
            .field("gated", &self.gate.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ProviderError::internal(e.to_string()))?
                .forget();
        }

        Ok((self.responder)(request, index)?)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// A scripted speech synthesizer.
#[derive(Debug)]
pub struct MockSynthesizer {
    replies: Vec<MockReply<SpeechResponse>>,
    calls: AtomicUsize,
    requests: Mutex<Vec<SpeechRequest>>,
}

impl MockSynthesizer {
    /// Create a synthesizer that cycles through `replies`.
    #[must_use]
    pub fn new(replies: Vec<MockReply<SpeechResponse>>) -> Self {
        Self {
            replies,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A synthesizer that always returns `audio` as MPEG.
    #[must_use]
    pub fn returning(audio: &[u8]) -> Self {
        Self::new(vec![Ok(SpeechResponse::new(audio.to_vec(), "audio/mpeg"))])
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<SpeechRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SpeechRequest) -> Result<SpeechResponse> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        match self.replies.get(index % self.replies.len().max(1)) {
            Some(reply) => Ok(reply.clone()?),
            None => Ok(SpeechResponse::new(Vec::new(), "audio/mpeg")),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::generation::Part;

    #[tokio::test]
    async fn test_generator_cycles_replies() {
        let generator = MockGenerator::new(vec![
            Ok(GenerateResponse::new(vec![Part::Text("first".into())])),
            Err(ProviderError::network("down")),
        ]);
        let request = GenerateRequest::new("m").text("hi");

        let r1 = generator.generate(&request).await.unwrap();
        assert_eq!(r1.text(), "first");
        assert!(generator.generate(&request).await.is_err());
        assert_eq!(generator.generate(&request).await.unwrap().text(), "first");
        assert_eq!(generator.calls(), 3);
        assert_eq!(generator.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_generator_from_fn_sees_request() {
        let generator = MockGenerator::from_fn(|req, _| {
            Ok(GenerateResponse::new(vec![Part::Text(format!(
                "{} images",
                req.image_count()
            ))]))
        });
        let response = generator
            .generate(&GenerateRequest::new("m").text("x"))
            .await
            .unwrap();
        assert_eq!(response.text(), "0 images");
    }

    #[tokio::test]
    async fn test_gated_generator_waits_for_permit() {
        let gate = Arc::new(Semaphore::new(0));
        let generator =
            Arc::new(MockGenerator::new(vec![Ok(GenerateResponse::default())]).gated(gate.clone()));

        let task = {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate(&GenerateRequest::new("m")).await })
        };
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        gate.add_permits(1);
        assert!(task.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_synthesizer_records_requests() {
        let speech = MockSynthesizer::returning(b"mp3");
        let request = SpeechRequest::new("sk", "voice", "Hello");

        let response = speech.synthesize(&request).await.unwrap();
        assert_eq!(response.audio, b"mp3");
        assert_eq!(speech.requests()[0].voice_id, "voice");
        assert_eq!(speech.calls(), 1);
    }

    #[tokio::test]
    async fn test_synthesizer_scripted_failure() {
        let speech = MockSynthesizer::new(vec![Err(ProviderError::auth("mock", "Status: 401."))]);
        let err = speech
            .synthesize(&SpeechRequest::new("bad", "v", "t"))
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }
}
