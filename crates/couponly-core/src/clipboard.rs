//! Clipboard seam. Production uses the system clipboard via `arboard`.

use tracing::debug;

use crate::error::CoreError;

/// Anything a coupon code can be copied into.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<(), CoreError>;
}

/// The OS clipboard.
///
/// The `arboard` handle is opened on first use and kept for the lifetime
/// of this value: on X11/Wayland the copied text is only served while a
/// handle is alive.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CoreError> {
        let mut clipboard = match self.inner.take() {
            Some(c) => c,
            None => arboard::Clipboard::new().map_err(|e| CoreError::Clipboard {
                message: format!("failed to initialize clipboard: {e}"),
            })?,
        };

        let result = clipboard
            .set_text(text.to_owned())
            .map_err(|e| CoreError::Clipboard {
                message: format!("failed to set clipboard: {e}"),
            });
        self.inner = Some(clipboard);
        result?;

        debug!(len = text.len(), "copied text to clipboard");
        Ok(())
    }
}
