//! Delayed image loading
//!
//! Images may be fetched and decoded off the document thread. Decoders push
//! results into an [`ImageLoadQueue`] handle from any thread; the buffer
//! drains the queue on the document thread before its next layout pass, so
//! the tree itself is never touched concurrently.

use parking_lot::Mutex;
use std::sync::Arc;

/// A decoded image ready to be applied to the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Source the image objects were created with
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn new(source: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            source: source.into(),
            width,
            height,
        }
    }
}

/// Cloneable, thread-safe queue of decoded images
#[derive(Debug, Clone, Default)]
pub struct ImageLoadQueue {
    inner: Arc<Mutex<Vec<DecodedImage>>>,
}

impl ImageLoadQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a decoded image; callable from any thread
    pub fn submit(&self, image: DecodedImage) {
        self.inner.lock().push(image);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&self) -> Vec<DecodedImage> {
        core::mem::take(&mut *self.inner.lock())
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.lock().len()
    }
}
