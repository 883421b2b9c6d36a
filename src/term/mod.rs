//! # Terminal Adapter
//!
//! Wires the pieces together: load the portfolio, build the script, play it
//! against either the live [`TerminalRenderer`] or, with `--plain`, a
//! [`Transcript`] that is printed once at the end. [`run_until`] adds an
//! early exit, used by the binary to stop cleanly on Ctrl-C.
//!
//! This is the only module that knows about crossterm.

mod terminal;
mod transcript;

pub use terminal::{CursorGuard, TerminalRenderer};
pub use transcript::{Block, Transcript, TranscriptLine};

use std::fmt;
use std::future::Future;
use std::io::{self, Write};

use log::info;

use crate::core::config::ResolvedConfig;
use crate::core::portfolio::{build_script, default_sites};
use crate::core::prompt::Prompt;
use crate::core::script::{PlaybackError, play};
use crate::source::{ProfileSource, SourceError, load_portfolio};

#[derive(Debug)]
pub enum RunError {
    /// Fetching the portfolio failed; nothing was rendered.
    Source(SourceError),
    Playback(PlaybackError),
    Io(io::Error),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Source(e) => write!(f, "failed to load portfolio: {e}"),
            RunError::Playback(e) => write!(f, "playback failed: {e}"),
            RunError::Io(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RunError::Source(e) => Some(e),
            RunError::Playback(e) => Some(e),
            RunError::Io(e) => Some(e),
        }
    }
}

impl From<SourceError> for RunError {
    fn from(e: SourceError) -> Self {
        RunError::Source(e)
    }
}

impl From<PlaybackError> for RunError {
    fn from(e: PlaybackError) -> Self {
        RunError::Playback(e)
    }
}

impl From<io::Error> for RunError {
    fn from(e: io::Error) -> Self {
        RunError::Io(e)
    }
}

/// How a playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    Interrupted,
}

/// Fetches the portfolio for `config.account` and plays it into `out`.
pub async fn run<W: Write>(
    config: &ResolvedConfig,
    source: &dyn ProfileSource,
    mut out: W,
) -> Result<(), RunError> {
    // Both fetches complete before anything is drawn
    let portfolio = load_portfolio(source, &config.account).await?;
    let sites = config.sites.clone().unwrap_or_else(|| {
        default_sites(&config.account, portfolio.profile.html_url.as_deref())
    });
    let steps = build_script(&portfolio, &sites);

    if config.plain {
        let mut prompt = Prompt::new(config.session.clone(), config.timing, Transcript::new());
        play(&mut prompt, steps).await?;
        let text: String = prompt
            .into_renderer()
            .to_plain_text()
            .chars()
            .filter(|&c| c == '\n' || !c.is_control())
            .collect();
        out.write_all(text.as_bytes())?;
        out.flush()?;
    } else {
        let columns = crossterm::terminal::size().ok().map(|(columns, _)| columns);
        let renderer = TerminalRenderer::new(out).with_columns(columns);
        let mut prompt = Prompt::new(config.session.clone(), config.timing, renderer);
        play(&mut prompt, steps).await?;
        prompt.into_renderer().finish()?;
    }

    info!("Session for {} complete", config.account);
    Ok(())
}

/// Like [`run`], but gives up as soon as `interrupt` resolves. Dropping the
/// unfinished playback erases the fake cursor and ends its row.
pub async fn run_until<W, F>(
    config: &ResolvedConfig,
    source: &dyn ProfileSource,
    out: W,
    interrupt: F,
) -> Result<Outcome, RunError>
where
    W: Write,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = run(config, source, out) => result.map(|()| Outcome::Finished),
        () = interrupt => {
            info!("Session for {} interrupted", config.account);
            Ok(Outcome::Interrupted)
        }
    }
}
