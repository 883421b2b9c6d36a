//! Inline ANSI renderer for a real terminal.
//!
//! Nothing is redrawn: every call appends at the bottom of the output, so
//! the terminal's own scrollback plays the role of the page. The fake cursor
//! glyph is always the last thing printed; erasing it moves back to the
//! column it was drawn at and clears to the end of the line.
//!
//! Images cannot be drawn inline portably, so they become a framed
//! placeholder with the alt text linked (OSC 8) to the source.

use std::borrow::Cow;
use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveLeft, MoveToColumn, Show};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{execute, queue};
use log::{debug, info};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::render::{Fragment, Image, Renderer};
use crate::core::session::Session;

const IDENTITY_COLOR: Color = Color::Green;
const DIR_COLOR: Color = Color::Yellow;
const TEXT_COLOR: Color = Color::Grey;
const CURSOR_COLOR: Color = Color::DarkGrey;

pub struct TerminalRenderer<W: Write> {
    out: W,
    cursor_glyph: String,
    cursor_shown: bool,
    /// False until something has been printed; the first row needs no break.
    started: bool,
    finished: bool,
    /// Terminal width in cells. Without it the glyph is erased relative to
    /// the real cursor.
    columns: Option<u16>,
    /// Cells used on the current row. Equal to `columns` while the terminal
    /// holds a pending wrap.
    column: u16,
    cursor_column: u16,
    /// The glyph didn't fit and wrapped onto the next row.
    glyph_wrapped: bool,
    /// Erasing a wrapped glyph left the real cursor at the start of the next
    /// row, where the next break must not add another one.
    soft_wrapped: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cursor_glyph: String::new(),
            cursor_shown: false,
            started: false,
            finished: false,
            columns: None,
            column: 0,
            cursor_column: 0,
            glyph_wrapped: false,
            soft_wrapped: false,
        }
    }

    pub fn with_columns(mut self, columns: Option<u16>) -> Self {
        self.columns = columns.filter(|&c| c > 0);
        self
    }

    /// Ends the playback on a fresh row so the shell prompt doesn't land on
    /// the last output line. Runs on drop if never called.
    pub fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        self.erase_cursor()?;
        self.cursor_shown = false;
        if self.started {
            self.newline()?;
        }
        self.out.flush()
    }

    fn break_row(&mut self) -> io::Result<()> {
        if self.started {
            self.newline()?;
        }
        self.started = true;
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        if self.soft_wrapped {
            queue!(self.out, Print("\r"))?;
        } else {
            queue!(self.out, Print("\r\n"))?;
        }
        self.column = 0;
        self.soft_wrapped = false;
        Ok(())
    }

    /// Tracks the column `text` leaves the terminal at, wrapping the way the
    /// terminal does.
    fn advance(&mut self, text: &str) {
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as u16;
            if width == 0 {
                continue;
            }
            self.soft_wrapped = false;
            self.column = match self.columns {
                Some(columns) if self.column + width > columns => width,
                _ => self.column.saturating_add(width),
            };
        }
    }

    fn print_colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        let text = sanitize(text);
        self.advance(&text);
        queue!(self.out, SetForegroundColor(color), Print(&text))
    }

    fn print_plain(&mut self, text: &str) -> io::Result<()> {
        self.advance(text);
        queue!(self.out, Print(text))
    }

    fn cursor_width(&self) -> u16 {
        (self.cursor_glyph.width() as u16).max(1)
    }

    fn draw_cursor(&mut self) -> io::Result<()> {
        let width = self.cursor_width();
        self.glyph_wrapped =
            matches!(self.columns, Some(columns) if self.column + width > columns);
        self.cursor_column = if self.glyph_wrapped { 0 } else { self.column };
        queue!(
            self.out,
            SetForegroundColor(CURSOR_COLOR),
            Print(&self.cursor_glyph),
            ResetColor
        )
    }

    fn erase_cursor(&mut self) -> io::Result<()> {
        if !self.cursor_shown {
            return Ok(());
        }
        if self.columns.is_some() {
            queue!(
                self.out,
                MoveToColumn(self.cursor_column),
                Clear(ClearType::UntilNewLine)
            )?;
            self.column = self.cursor_column;
            if self.glyph_wrapped {
                self.soft_wrapped = true;
            }
        } else {
            let width = self.cursor_width();
            queue!(
                self.out,
                MoveLeft(width),
                Clear(ClearType::UntilNewLine)
            )?;
        }
        Ok(())
    }

    fn print_fragment(&mut self, fragment: &Fragment) -> io::Result<()> {
        match fragment {
            Fragment::Text(text) => {
                self.print_colored(TEXT_COLOR, text)?;
                queue!(self.out, ResetColor)
            }
            Fragment::Break => self.newline(),
            Fragment::Link { text, url } => {
                let text = sanitize(text);
                let url = sanitize(url);
                self.advance(&text);
                queue!(
                    self.out,
                    Print(hyperlink_open(&url)),
                    Print((&*text).blue().bold().underlined()),
                    Print(hyperlink_close())
                )
            }
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn append_line(&mut self, session: &Session) -> io::Result<()> {
        self.break_row()?;
        self.print_colored(IDENTITY_COLOR, &session.identity())?;
        self.print_colored(TEXT_COLOR, ":")?;
        self.print_colored(DIR_COLOR, &session.dir)?;
        self.print_colored(TEXT_COLOR, "$ ")?;
        queue!(self.out, ResetColor)?;
        self.cursor_glyph = sanitize(&session.cursor).into_owned();
        self.draw_cursor()?;
        self.cursor_shown = true;
        self.out.flush()
    }

    fn append_text(&mut self, fragments: &[Fragment]) -> io::Result<()> {
        self.erase_cursor()?;
        for fragment in fragments {
            self.print_fragment(fragment)?;
        }
        if self.cursor_shown {
            self.draw_cursor()?;
        }
        self.out.flush()
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.erase_cursor()?;
        self.cursor_shown = false;
        self.out.flush()
    }

    fn append_image(&mut self, image: &Image) -> io::Result<()> {
        // Rows above the bottom are out of reach, so the cursor can't stay
        // behind on the line the image follows.
        self.erase_cursor()?;
        self.cursor_shown = false;
        debug!("Image placeholder for {}", image.src);

        let rows = image_rows(image);
        let inner = rows.iter().map(|r| r.width()).max().unwrap_or(0);
        let bar = "─".repeat(inner + 2);

        self.break_row()?;
        self.print_plain(&format!("┌{bar}┐"))?;
        for (i, row) in rows.iter().enumerate() {
            let pad = " ".repeat(inner - row.width());
            self.newline()?;
            self.print_plain("│ ")?;
            if i == 0 && !image.src.is_empty() {
                self.print_fragment(&Fragment::link(row, &image.src))?;
            } else {
                self.print_fragment(&Fragment::text(row))?;
            }
            self.print_plain(&format!("{pad} │"))?;
        }
        self.newline()?;
        self.print_plain(&format!("└{bar}┘"))?;
        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.finish();
        }
    }
}

/// Text rows inside an image placeholder: alt text, size, source.
fn image_rows(image: &Image) -> Vec<String> {
    let src = if image.src.is_empty() {
        "(no source)".to_string()
    } else {
        sanitize(&image.src).into_owned()
    };
    vec![
        sanitize(&image.alt).into_owned(),
        format!("{}×{}", image.width, image.height),
        src,
    ]
}

/// Strips control characters, so fetched text can't carry its own escape
/// sequences. Line breaks arrive as [`Fragment::Break`], never inline.
fn sanitize(text: &str) -> Cow<'_, str> {
    if text.chars().any(char::is_control) {
        Cow::Owned(text.chars().filter(|c| !c.is_control()).collect())
    } else {
        Cow::Borrowed(text)
    }
}

fn hyperlink_open(url: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\")
}

fn hyperlink_close() -> &'static str {
    "\x1b]8;;\x1b\\"
}

/// Hides the real terminal cursor while the fake one is on screen and shows
/// it again on drop.
pub struct CursorGuard<W: Write> {
    out: W,
}

impl<W: Write> CursorGuard<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        execute!(out, Hide)?;
        info!("Terminal cursor hidden for playback");
        Ok(Self { out })
    }
}

impl<W: Write> Drop for CursorGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, Show);
        debug!("Terminal cursor restored");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SharedBuffer;

    fn renderer() -> (TerminalRenderer<SharedBuffer>, SharedBuffer) {
        let buf = SharedBuffer::default();
        (TerminalRenderer::new(buf.clone()), buf)
    }

    #[test]
    fn test_first_line_has_no_leading_break() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        let out = buf.contents();
        assert!(!out.starts_with("\r\n"));
        assert!(out.contains("mystpi@laptop"));
        assert!(out.contains("~/"));
        assert!(out.ends_with("█\x1b[0m"));
    }

    #[test]
    fn test_second_line_starts_new_row() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.append_line(&Session::default()).unwrap();
        assert_eq!(buf.contents().matches("\r\n").count(), 1);
    }

    #[test]
    fn test_typing_redraws_cursor_after_text() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.append_text(&[Fragment::text("h")]).unwrap();
        let out = buf.contents();
        let erase = "\x1b[1D\x1b[K";
        let h = out.rfind('h').unwrap();
        assert!(out.contains(erase));
        assert!(out.rfind('█').unwrap() > h);
    }

    #[test]
    fn test_hide_cursor_erases_once() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.hide_cursor().unwrap();
        r.hide_cursor().unwrap();
        assert_eq!(buf.contents().matches("\x1b[K").count(), 1);
    }

    #[test]
    fn test_link_is_osc8_hyperlink() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.append_text(&[Fragment::link("Blog", "/blog")]).unwrap();
        let out = buf.contents();
        assert!(out.contains("\x1b]8;;/blog\x1b\\"));
        assert!(out.contains("Blog"));
        assert!(out.contains(hyperlink_close()));
    }

    #[test]
    fn test_fetched_escapes_are_stripped() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.append_text(&[
            Fragment::text("a\x1b[2Jb"),
            Fragment::link("x\x07y", "https://evil.example/\x1b]8;;"),
        ])
        .unwrap();
        let out = buf.contents();
        assert!(out.contains("a[2Jb"));
        assert!(!out.contains("\x1b[2J"));
        assert!(!out.contains('\x07'));
        assert!(out.contains("\x1b]8;;https://evil.example/]8;;\x1b\\"));
    }

    #[test]
    fn test_glyph_in_last_column_erased_in_place() {
        let buf = SharedBuffer::default();
        let mut r = TerminalRenderer::new(buf.clone()).with_columns(Some(20));
        // "mystpi@laptop:~/$ " is 18 cells wide
        r.append_line(&Session::default()).unwrap();
        r.append_text(&[Fragment::text("a")]).unwrap();
        r.hide_cursor().unwrap();
        let out = buf.contents();
        // 1-based column 20 is where the glyph sits, after the typed "a"
        assert!(out.ends_with("\x1b[20G\x1b[K"));
        assert!(!out.contains("\x1b[1D"));
    }

    #[test]
    fn test_wrapped_glyph_does_not_add_blank_row() {
        let buf = SharedBuffer::default();
        let mut r = TerminalRenderer::new(buf.clone()).with_columns(Some(20));
        r.append_line(&Session::default()).unwrap();
        r.append_text(&[Fragment::text("ab")]).unwrap();
        r.append_text(&[Fragment::Break, Fragment::text("x")]).unwrap();
        let out = buf.contents();
        // the glyph wrapped to column 1 of the next row; that row is kept
        assert!(out.contains("\x1b[1G\x1b[K\r"));
        assert!(!out.contains("\r\n"));
    }

    #[test]
    fn test_drop_erases_glyph_and_ends_row() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        drop(r);
        assert!(buf.contents().ends_with("\x1b[1D\x1b[K\r\n"));
    }

    #[test]
    fn test_finish_then_drop_writes_once() {
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.finish().unwrap();
        drop(r);
        assert_eq!(buf.contents().matches("\r\n").count(), 1);
    }

    #[test]
    fn test_cursor_guard_shows_cursor_on_drop() {
        let buf = SharedBuffer::default();
        let guard = CursorGuard::new(buf.clone()).unwrap();
        assert_eq!(buf.contents(), "\x1b[?25l");
        drop(guard);
        assert_eq!(buf.contents(), "\x1b[?25l\x1b[?25h");
    }

    #[test]
    fn test_image_placeholder_frame() {
        let image = Image {
            src: "https://avatars.example/u/1".into(),
            alt: "profile picture".into(),
            width: 100,
            height: 100,
        };
        let (mut r, buf) = renderer();
        r.append_line(&Session::default()).unwrap();
        r.append_image(&image).unwrap();
        let out = buf.contents();
        assert!(out.contains("┌"));
        assert!(out.contains("100×100"));
        assert!(out.contains("\x1b]8;;https://avatars.example/u/1\x1b\\"));
        assert!(out.trim_end().ends_with('┘'));
    }

    #[test]
    fn test_image_rows_without_source() {
        let image = Image {
            src: String::new(),
            alt: "profile picture".into(),
            width: 100,
            height: 100,
        };
        assert_eq!(image_rows(&image)[2], "(no source)");
    }
}
