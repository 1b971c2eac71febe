//! # Operator Notifications
//!
//! Toasts, the full-screen new-order alert and the audible cue. Producers (the
//! board actor, the clients) hold a cheap [`Notifier`]; the surface that renders
//! them owns the receiver and feeds a [`ToastTray`] and an [`AlertOverlay`].

pub mod alert;
pub mod sound;
pub mod toast;

pub use alert::AlertOverlay;
pub use sound::SoundCue;
pub use toast::ToastTray;

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Toast(Toast),
    /// Full-screen new-order alert text.
    Alert(String),
    /// Number of beeps to play.
    Beep(u32),
}

/// Sending half of the notification channel.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, notice: Notice) {
        debug!(?notice, "Notice");
        // A closed surface simply stops listening
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, title: impl Into<String>, description: Option<String>) {
        self.emit(Notice::Toast(Toast {
            kind: ToastKind::Success,
            title: title.into(),
            description,
        }));
    }

    pub fn failure(&self, title: impl Into<String>, description: Option<String>) {
        self.emit(Notice::Toast(Toast {
            kind: ToastKind::Failure,
            title: title.into(),
            description,
        }));
    }

    pub fn alert(&self, text: impl Into<String>) {
        self.emit(Notice::Alert(text.into()));
    }

    pub fn beep(&self, times: u32) {
        self.emit(Notice::Beep(times));
    }
}
