use arboard::Clipboard;

/// System clipboard access for yanked cell content.
pub struct SystemClipboard;

impl SystemClipboard {
    /// Places text on the system clipboard.
    ///
    /// Best-effort: terminals without a clipboard provider (headless
    /// sessions, some SSH setups) report an error the caller can surface
    /// in the status bar.
    pub fn copy_text(text: &str) -> Result<(), arboard::Error> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text.to_string())
    }
}
