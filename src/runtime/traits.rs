//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::narration::NarrationQueue;
use std::sync::Arc;

/// Destination for bot text that should be spoken
pub trait Narrator: Send + Sync {
    /// Queue text for narration. Must not block.
    fn narrate(&self, text: &str);
}

impl Narrator for NarrationQueue {
    fn narrate(&self, text: &str) {
        self.enqueue(text);
    }
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

impl<T: Narrator + ?Sized> Narrator for Arc<T> {
    fn narrate(&self, text: &str) {
        (**self).narrate(text);
    }
}
