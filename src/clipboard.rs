use arboard::Clipboard;

use crate::error::{LinksiftError, Result};

/// Clipboard wrapper that degrades gracefully: a missing clipboard (no
/// display server, headless session) becomes a dispatch error surfaced in
/// the status line, never a startup failure.
pub struct ClipboardManager {
    clipboard: Option<Clipboard>,
}

impl ClipboardManager {
    pub fn new() -> Self {
        let clipboard = match Clipboard::new() {
            Ok(cb) => Some(cb),
            Err(e) => {
                tracing::warn!("clipboard unavailable: {}", e);
                None
            }
        };
        Self { clipboard }
    }

    pub fn is_available(&self) -> bool {
        self.clipboard.is_some()
    }

    /// Copy text to the system clipboard.
    pub fn copy(&mut self, text: &str) -> Result<()> {
        match self.clipboard.as_mut() {
            Some(cb) => cb
                .set_text(text.to_string())
                .map_err(|e| LinksiftError::Dispatch(format!("clipboard: {}", e))),
            None => Err(LinksiftError::Dispatch("clipboard not available".to_string())),
        }
    }

    /// Copy text to the X11/Wayland primary selection. Elsewhere this is
    /// the same as the clipboard.
    #[cfg(target_os = "linux")]
    pub fn copy_primary(&mut self, text: &str) -> Result<()> {
        use arboard::{LinuxClipboardKind, SetExtLinux};
        match self.clipboard.as_mut() {
            Some(cb) => cb
                .set()
                .clipboard(LinuxClipboardKind::Primary)
                .text(text.to_string())
                .map_err(|e| LinksiftError::Dispatch(format!("primary selection: {}", e))),
            None => Err(LinksiftError::Dispatch("clipboard not available".to_string())),
        }
    }

    #[cfg(not(target_os = "linux"))]
    pub fn copy_primary(&mut self, text: &str) -> Result<()> {
        self.copy(text)
    }
}

impl Default for ClipboardManager {
    fn default() -> Self {
        Self::new()
    }
}
