// src/clipboard.rs
use std::io::Write;

#[cfg(not(windows))]
use clipboard::{ClipboardContext, ClipboardProvider};

#[cfg(windows)]
use clipboard_win::{formats, Clipboard, Setter};

use crate::error::{Error, Result};

/// Destination of a composed prompt.
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard.
#[derive(Debug, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(windows))]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut ctx: ClipboardContext =
            ClipboardProvider::new().map_err(|e| Error::Clipboard(e.to_string()))?;
        ctx.set_contents(text.to_owned())
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}

#[cfg(windows)]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let _clip = Clipboard::new_attempts(10).map_err(|e| Error::Clipboard(format!("{:?}", e)))?;
        formats::Unicode
            .write_clipboard(&text)
            .map_err(|e| Error::Clipboard(format!("{:?}", e)))
    }
}

/// Writes the prompt to stdout instead of the clipboard.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl ClipboardSink for StdoutSink {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)
            .and_then(|_| stdout.flush())
            .map_err(|e| Error::Clipboard(e.to_string()))
    }
}

/// Keeps everything it receives in memory. Useful when no system clipboard
/// is available, e.g. in tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    history: Vec<String>,
}

impl MemoryClipboard {
    /// The most recently copied text.
    pub fn contents(&self) -> Option<&str> {
        self.history.last().map(String::as_str)
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        self.history.push(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard_keeps_latest() {
        let mut clipboard = MemoryClipboard::default();
        assert_eq!(clipboard.contents(), None);

        clipboard.set_text("one").unwrap();
        clipboard.set_text("two").unwrap();
        assert_eq!(clipboard.contents(), Some("two"));
        assert_eq!(clipboard.history().to_vec(), vec!["one".to_string(), "two".to_string()]);
    }
}
