//! Sharing a link from a terminal.
//!
//! There is no native share sheet, so `share` always reports `Unsupported`
//! and the caller falls back to the clipboard. The clipboard is reached with
//! an OSC 52 escape sequence, which most terminal emulators honor.

use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use newsdesk_core::ShareRequest;

#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("sharing is not supported here")]
    Unsupported,
    #[error("failed to write to the terminal: {0}")]
    Io(#[from] std::io::Error),
}

pub trait Sharer: Send {
    fn share(&mut self, request: &ShareRequest) -> Result<(), ShareError>;
    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), ShareError>;
}

pub struct TerminalSharer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalSharer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Sharer for TerminalSharer<W> {
    fn share(&mut self, _request: &ShareRequest) -> Result<(), ShareError> {
        Err(ShareError::Unsupported)
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), ShareError> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()?;
        Ok(())
    }
}
