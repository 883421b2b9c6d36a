//! # Script Playback
//!
//! A script is a flat list of [`Step`]s played strictly in order against a
//! [`Prompt`]. Typing steps and callbacks are awaited before the next step
//! begins; everything else runs synchronously.
//!
//! ```text
//! [TypeText] ─await─▶ [ChangeDir] ─▶ [NewLine] ─▶ [TypeText] ─await─▶ [ShowOutput] ─▶ …
//! ```
//!
//! There is no branching and no recovery: the first failing step ends the
//! playback and its error is returned to the caller.

use std::fmt;
use std::future::Future;
use std::io;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, info, warn};

use crate::core::prompt::Prompt;
use crate::core::render::{Image, Renderer};
use crate::core::tree::TreeEntry;

pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A zero-argument side effect, awaited by the interpreter.
pub type Callback = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), CallbackError>> + Send>;

pub enum Step {
    TypeText {
        text: String,
        char_delay: Option<Duration>,
        pause: Option<Duration>,
    },
    ShowOutput(String),
    ShowTree {
        dir: String,
        entries: Vec<TreeEntry>,
    },
    ShowImage(Image),
    NewLine,
    ChangeDir(String),
    RunCallback(Callback),
}

impl Step {
    pub fn type_text(text: impl Into<String>) -> Self {
        Step::TypeText {
            text: text.into(),
            char_delay: None,
            pause: None,
        }
    }

    pub fn type_text_with(text: impl Into<String>, char_delay: Duration, pause: Duration) -> Self {
        Step::TypeText {
            text: text.into(),
            char_delay: Some(char_delay),
            pause: Some(pause),
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Step::ShowOutput(text.into())
    }

    pub fn tree(dir: impl Into<String>, entries: Vec<TreeEntry>) -> Self {
        Step::ShowTree {
            dir: dir.into(),
            entries,
        }
    }

    pub fn change_dir(dir: impl Into<String>) -> Self {
        Step::ChangeDir(dir.into())
    }

    /// Wraps a synchronous callback.
    pub fn run<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), CallbackError> + Send + 'static,
    {
        Step::RunCallback(Box::new(move || futures::future::ready(f()).boxed()))
    }

    /// Wraps an asynchronous callback.
    pub fn run_async<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), CallbackError>> + Send + 'static,
    {
        Step::RunCallback(Box::new(move || f().boxed()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Step::TypeText { .. } => "type",
            Step::ShowOutput(_) => "output",
            Step::ShowTree { .. } => "tree",
            Step::ShowImage(_) => "image",
            Step::NewLine => "newline",
            Step::ChangeDir(_) => "cd",
            Step::RunCallback(_) => "callback",
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::TypeText {
                text,
                char_delay,
                pause,
            } => f
                .debug_struct("TypeText")
                .field("text", text)
                .field("char_delay", char_delay)
                .field("pause", pause)
                .finish(),
            Step::ShowOutput(text) => f.debug_tuple("ShowOutput").field(text).finish(),
            Step::ShowTree { dir, entries } => f
                .debug_struct("ShowTree")
                .field("dir", dir)
                .field("entries", entries)
                .finish(),
            Step::ShowImage(image) => f.debug_tuple("ShowImage").field(image).finish(),
            Step::NewLine => f.write_str("NewLine"),
            Step::ChangeDir(dir) => f.debug_tuple("ChangeDir").field(dir).finish(),
            Step::RunCallback(_) => f.write_str("RunCallback(..)"),
        }
    }
}

#[derive(Debug)]
pub enum PlaybackError {
    /// The renderer failed to write.
    Io(io::Error),
    /// A callback step returned an error. `step` is its zero-based index.
    Callback { step: usize, source: CallbackError },
}

impl fmt::Display for PlaybackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackError::Io(e) => write!(f, "render error: {e}"),
            PlaybackError::Callback { step, source } => {
                write!(f, "callback at step {step} failed: {source}")
            }
        }
    }
}

impl std::error::Error for PlaybackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlaybackError::Io(e) => Some(e),
            PlaybackError::Callback { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<io::Error> for PlaybackError {
    fn from(e: io::Error) -> Self {
        PlaybackError::Io(e)
    }
}

/// Plays `steps` in order. Returns at the first failing step; the steps
/// after it never run.
pub async fn play<R: Renderer>(
    prompt: &mut Prompt<R>,
    steps: Vec<Step>,
) -> Result<(), PlaybackError> {
    let total = steps.len();
    info!("Playing script: {} steps", total);

    for (index, step) in steps.into_iter().enumerate() {
        debug!("Step {}/{}: {:?}", index + 1, total, step);
        match step {
            Step::TypeText {
                text,
                char_delay,
                pause,
            } => prompt.write(&text, char_delay, pause).await?,
            Step::ShowOutput(text) => prompt.output(&text)?,
            Step::ShowTree { dir, entries } => prompt.tree(&dir, &entries)?,
            Step::ShowImage(image) => prompt.image(&image)?,
            Step::NewLine => prompt.new_line()?,
            Step::ChangeDir(dir) => prompt.change_dir(dir),
            Step::RunCallback(callback) => {
                if let Err(source) = callback().await {
                    warn!("Callback at step {} failed: {}", index, source);
                    return Err(PlaybackError::Callback {
                        step: index,
                        source,
                    });
                }
            }
        }
    }

    info!("Playback finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{instant_prompt, shared_log};

    #[tokio::test]
    async fn test_steps_run_in_order() {
        let log = shared_log();
        let steps = (0..4)
            .map(|i| {
                let log = log.clone();
                Step::run(move || {
                    log.lock().unwrap().push(i);
                    Ok(())
                })
            })
            .collect();

        let mut prompt = instant_prompt();
        play(&mut prompt, steps).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_failing_callback_halts_remaining_steps() {
        let log = shared_log();
        let after = log.clone();
        let steps = vec![
            Step::NewLine,
            Step::type_text("ok"),
            Step::run(|| Err("boom".into())),
            Step::output("never"),
            Step::run(move || {
                after.lock().unwrap().push(1);
                Ok(())
            }),
        ];

        let mut prompt = instant_prompt();
        let err = play(&mut prompt, steps).await.unwrap_err();

        match err {
            PlaybackError::Callback { step, ref source } => {
                assert_eq!(step, 2);
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(log.lock().unwrap().is_empty());
        let lines = prompt.renderer().lines();
        assert_eq!(lines[0].text(), "ok");
        assert!(lines[0].cursor_visible);
    }

    #[tokio::test]
    async fn test_async_callback_is_awaited() {
        let log = shared_log();
        let inner = log.clone();
        let after = log.clone();
        let steps = vec![
            Step::run_async(move || async move {
                tokio::task::yield_now().await;
                inner.lock().unwrap().push(1);
                Ok(())
            }),
            Step::run(move || {
                after.lock().unwrap().push(2);
                Ok(())
            }),
        ];

        let mut prompt = instant_prompt();
        play(&mut prompt, steps).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_change_dir_affects_later_lines_only() {
        let steps = vec![
            Step::NewLine,
            Step::type_text("cd profile"),
            Step::change_dir("~/profile"),
            Step::NewLine,
        ];

        let mut prompt = instant_prompt();
        play(&mut prompt, steps).await.unwrap();

        let lines = prompt.renderer().lines();
        assert_eq!(lines[0].session.dir, "~/");
        assert_eq!(lines[1].session.dir, "~/profile");
        assert_eq!(prompt.session().dir, "~/profile");
    }

    #[tokio::test]
    async fn test_image_step_reaches_renderer() {
        let image = Image {
            src: "https://example.com/a.png".into(),
            alt: "profile picture".into(),
            width: 100,
            height: 100,
        };
        let mut prompt = instant_prompt();
        play(&mut prompt, vec![Step::NewLine, Step::ShowImage(image.clone())])
            .await
            .unwrap();
        assert_eq!(prompt.renderer().images(), vec![&image]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_type_text_timing_overrides_prompt_default() {
        use crate::core::prompt::Timing;
        use crate::core::session::Session;
        use crate::term::Transcript;

        let mut prompt = Prompt::new(Session::default(), Timing::default(), Transcript::new());
        let start = tokio::time::Instant::now();
        let steps = vec![
            Step::NewLine,
            Step::type_text_with("abcd", Duration::from_millis(10), Duration::ZERO),
        ];
        play(&mut prompt, steps).await.unwrap();

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(40));
        assert!(elapsed < Duration::from_millis(100));
        assert_eq!(prompt.renderer().lines()[0].text(), "abcd");
    }

    #[test]
    fn test_debug_hides_callback() {
        let step = Step::run(|| Ok(()));
        assert_eq!(format!("{step:?}"), "RunCallback(..)");
        assert_eq!(step.kind(), "callback");
    }

    #[test]
    fn test_callback_error_display() {
        let err = PlaybackError::Callback {
            step: 3,
            source: "nope".into(),
        };
        assert_eq!(err.to_string(), "callback at step 3 failed: nope");
    }
}
