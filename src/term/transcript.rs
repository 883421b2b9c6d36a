//! Headless renderer that records what a playback produced.
//!
//! Used by the test suite and by `--plain`, which skips the animation and
//! prints [`Transcript::to_plain_text`] once playback finishes.

use std::io;

use log::warn;

use crate::core::render::{Fragment, Image, Renderer};
use crate::core::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    /// Session as it was when the line was created.
    pub session: Session,
    pub fragments: Vec<Fragment>,
    pub cursor_visible: bool,
}

impl TranscriptLine {
    /// The text region with breaks as `\n` and links as their text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Text(t) => out.push_str(t),
                Fragment::Link { text, .. } => out.push_str(text),
                Fragment::Break => out.push('\n'),
            }
        }
        out
    }

    /// `(text, url)` of every link, in order.
    pub fn links(&self) -> Vec<(&str, &str)> {
        self.fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Link { text, url } => Some((text.as_str(), url.as_str())),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, fragment: &Fragment) {
        // Typed characters arrive one at a time; merge them back into runs.
        if let (Some(Fragment::Text(last)), Fragment::Text(next)) =
            (self.fragments.last_mut(), fragment)
        {
            last.push_str(next);
            return;
        }
        self.fragments.push(fragment.clone());
    }
}

/// A block of the document, in append order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Line(TranscriptLine),
    Image(Image),
}

#[derive(Debug, Default)]
pub struct Transcript {
    blocks: Vec<Block>,
    /// Index into `blocks` of the line that receives text.
    current: Option<usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn lines(&self) -> Vec<&TranscriptLine> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Line(line) => Some(line),
                Block::Image(_) => None,
            })
            .collect()
    }

    pub fn images(&self) -> Vec<&Image> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                Block::Image(image) => Some(image),
                Block::Line(_) => None,
            })
            .collect()
    }

    /// Renders the document as it would read on screen, without colors or
    /// cursors. Links keep their text; images become `[alt](src)`.
    pub fn to_plain_text(&self) -> String {
        let mut rows = Vec::with_capacity(self.blocks.len());
        for block in &self.blocks {
            match block {
                Block::Line(line) => rows.push(format!("{}{}", line.session.prefix(), line.text())),
                Block::Image(image) => rows.push(format!("[{}]({})", image.alt, image.src)),
            }
        }
        let mut out = rows.join("\n");
        out.push('\n');
        out
    }

    fn current_line(&mut self) -> Option<&mut TranscriptLine> {
        let index = self.current?;
        match self.blocks.get_mut(index) {
            Some(Block::Line(line)) => Some(line),
            _ => None,
        }
    }
}

impl Renderer for Transcript {
    fn append_line(&mut self, session: &Session) -> io::Result<()> {
        self.blocks.push(Block::Line(TranscriptLine {
            session: session.clone(),
            fragments: Vec::new(),
            cursor_visible: true,
        }));
        self.current = Some(self.blocks.len() - 1);
        Ok(())
    }

    fn append_text(&mut self, fragments: &[Fragment]) -> io::Result<()> {
        match self.current_line() {
            Some(line) => {
                for fragment in fragments {
                    line.push(fragment);
                }
            }
            None => warn!("Transcript has no current line, text dropped"),
        }
        Ok(())
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        if let Some(line) = self.current_line() {
            line.cursor_visible = false;
        }
        Ok(())
    }

    fn append_image(&mut self, image: &Image) -> io::Result<()> {
        self.blocks.push(Block::Image(image.clone()));
        Ok(())
    }
}
