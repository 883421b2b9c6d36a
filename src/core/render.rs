//! # Rendering Surface
//!
//! The only output channel of a playback. The prompt never touches the
//! terminal directly; it calls into a [`Renderer`], so the same script can
//! drive a real terminal or a headless [`Transcript`](crate::term::Transcript).
//!
//! ```text
//! Prompt ──append_line──▶ Renderer ──▶ TerminalRenderer (crossterm)
//!        ──append_text──▶          └─▶ Transcript (tests, --plain)
//!        ──hide_cursor──▶
//!        ──append_image─▶
//! ```

use std::io;

use crate::core::session::Session;

/// A piece of text appended to the current line's text region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text(String),
    /// A link opened in a new context (browser tab, terminal hyperlink).
    Link { text: String, url: String },
    Break,
}

impl Fragment {
    pub fn text(s: impl Into<String>) -> Self {
        Fragment::Text(s.into())
    }

    pub fn link(text: impl Into<String>, url: impl Into<String>) -> Self {
        Fragment::Link {
            text: text.into(),
            url: url.into(),
        }
    }

    /// Splits `s` on `\n`, mapping each newline to a [`Fragment::Break`].
    pub fn from_multiline(s: &str) -> Vec<Fragment> {
        let mut out = Vec::new();
        for (i, part) in s.split('\n').enumerate() {
            if i > 0 {
                out.push(Fragment::Break);
            }
            if !part.is_empty() {
                out.push(Fragment::Text(part.to_string()));
            }
        }
        out
    }
}

/// An inline image block (the profile picture).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub width: u16,
    pub height: u16,
}

pub trait Renderer {
    /// Appends a new prompt row decorated from `session`, with an empty text
    /// region and a visible cursor. It becomes the current line.
    fn append_line(&mut self, session: &Session) -> io::Result<()>;

    /// Appends fragments to the current line's text region.
    fn append_text(&mut self, fragments: &[Fragment]) -> io::Result<()>;

    /// Hides the current line's cursor. Idempotent; no-op without a line.
    fn hide_cursor(&mut self) -> io::Result<()>;

    /// Appends an image block after the current line.
    fn append_image(&mut self, image: &Image) -> io::Result<()>;
}
