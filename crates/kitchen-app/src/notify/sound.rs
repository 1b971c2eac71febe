//! Audible cue gate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sound stays muted until an operator gesture unlocks it, then stays on.
#[derive(Debug, Clone, Default)]
pub struct SoundCue {
    unlocked: Arc<AtomicBool>,
}

impl SoundCue {
    pub fn unlocked() -> Self {
        let cue = Self::default();
        cue.unlock();
        cue
    }

    pub fn unlock(&self) {
        self.unlocked.store(true, Ordering::SeqCst);
    }

    pub fn is_enabled(&self) -> bool {
        self.unlocked.load(Ordering::SeqCst)
    }
}
