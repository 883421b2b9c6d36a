//! # Command Prompt
//!
//! Owns the [`Session`] and a [`Renderer`], and implements the four
//! primitives the script is made of:
//!
//! - [`Prompt::new_line`]: hide the old cursor, start a fresh prompt row
//! - [`Prompt::write`]: typewriter, one character per `char_delay`
//! - [`Prompt::output`]: static output under the typed command
//! - [`Prompt::tree`]: box-drawing listing, delegated to `output`
//!
//! Everything but `write` is synchronous.

use std::io;
use std::time::Duration;

use log::warn;
use tokio::time::Instant;

use crate::core::delay;
use crate::core::render::{Fragment, Image, Renderer};
use crate::core::session::Session;
use crate::core::tree::{TreeEntry, tree_fragments};

pub const DEFAULT_CHAR_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(250);

/// Typewriter timing used when a step does not override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub char_delay: Duration,
    pub pause: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            char_delay: DEFAULT_CHAR_DELAY,
            pause: DEFAULT_PAUSE,
        }
    }
}

impl Timing {
    /// No delays at all; playback completes as fast as the renderer allows.
    pub fn instant() -> Self {
        Self {
            char_delay: Duration::ZERO,
            pause: Duration::ZERO,
        }
    }
}

pub struct Prompt<R: Renderer> {
    session: Session,
    timing: Timing,
    renderer: R,
    has_line: bool,
}

impl<R: Renderer> Prompt<R> {
    /// Creates a prompt with no lines yet. The first [`Prompt::new_line`]
    /// opens the first row.
    pub fn new(session: Session, timing: Timing, renderer: R) -> Self {
        Self {
            session,
            timing,
            renderer,
            has_line: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Changes the directory label. Existing lines keep the label they were
    /// created with.
    pub fn change_dir(&mut self, dir: impl Into<String>) {
        self.session.dir = dir.into();
    }

    pub fn hide_cursor(&mut self) -> io::Result<()> {
        if self.has_line {
            self.renderer.hide_cursor()?;
        }
        Ok(())
    }

    pub fn new_line(&mut self) -> io::Result<()> {
        self.hide_cursor()?;
        self.renderer.append_line(&self.session)?;
        self.has_line = true;
        Ok(())
    }

    /// Types `text` into the current line.
    ///
    /// Character `i` lands at `i * char_delay` after the call; the future
    /// resolves at `len * char_delay + pause`. `None` falls back to the
    /// prompt's [`Timing`].
    pub async fn write(
        &mut self,
        text: &str,
        char_delay: Option<Duration>,
        pause: Option<Duration>,
    ) -> io::Result<()> {
        let char_delay = char_delay.unwrap_or(self.timing.char_delay);
        let pause = pause.unwrap_or(self.timing.pause);
        let start = Instant::now();

        let mut count: u32 = 0;
        for ch in text.chars() {
            delay::wait_until(start, char_delay.saturating_mul(count)).await;
            let fragment = match ch {
                '\n' => Fragment::Break,
                _ => Fragment::Text(ch.to_string()),
            };
            self.append(&[fragment])?;
            count = count.saturating_add(1);
        }

        delay::wait_until(start, char_delay.saturating_mul(count)).await;
        delay::wait(pause).await;
        Ok(())
    }

    /// Appends a line break plus `text` to the current line and hides its
    /// cursor.
    pub fn output(&mut self, text: &str) -> io::Result<()> {
        self.output_fragments(Fragment::from_multiline(text))
    }

    pub fn tree(&mut self, dir: &str, entries: &[TreeEntry]) -> io::Result<()> {
        self.output_fragments(tree_fragments(dir, entries))
    }

    pub fn image(&mut self, image: &Image) -> io::Result<()> {
        self.renderer.append_image(image)
    }

    fn output_fragments(&mut self, fragments: Vec<Fragment>) -> io::Result<()> {
        let mut all = Vec::with_capacity(fragments.len() + 1);
        all.push(Fragment::Break);
        all.extend(fragments);
        self.append(&all)?;
        self.hide_cursor()
    }

    fn append(&mut self, fragments: &[Fragment]) -> io::Result<()> {
        if !self.has_line {
            warn!("Dropping {} fragment(s): no prompt line yet", fragments.len());
            return Ok(());
        }
        self.renderer.append_text(fragments)
    }
}
