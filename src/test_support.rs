//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::core::prompt::{Prompt, Timing};
use crate::core::session::Session;
use crate::source::{Profile, ProfileSource, Repository, SourceError};
use crate::term::Transcript;

/// A prompt over a headless transcript with all delays disabled.
pub fn instant_prompt() -> Prompt<Transcript> {
    Prompt::new(Session::default(), Timing::instant(), Transcript::new())
}

/// Shared, ordered record for callbacks to push into.
pub fn shared_log() -> Arc<Mutex<Vec<i32>>> {
    Arc::new(Mutex::new(Vec::new()))
}

/// In-memory writer whose clones all append to one buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Serves a fixed profile and repository list without any I/O.
pub struct StaticSource {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
}

impl StaticSource {
    pub fn sample() -> Self {
        Self {
            profile: Profile {
                login: "MystPi".to_string(),
                bio: Some("Hi!".to_string()),
                ..Default::default()
            },
            repositories: vec![
                Repository {
                    name: "one".to_string(),
                    html_url: Some("https://github.com/MystPi/one".to_string()),
                },
                Repository {
                    name: "two".to_string(),
                    html_url: Some("https://github.com/MystPi/two".to_string()),
                },
            ],
        }
    }
}

#[async_trait]
impl ProfileSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_profile(&self, _account: &str) -> Result<Profile, SourceError> {
        Ok(self.profile.clone())
    }

    async fn fetch_repositories(&self, _account: &str) -> Result<Vec<Repository>, SourceError> {
        Ok(self.repositories.clone())
    }
}

/// Profile loads, repositories fail with a network error.
pub struct FailingSource;

#[async_trait]
impl ProfileSource for FailingSource {
    fn name(&self) -> &str {
        "failing"
    }

    async fn fetch_profile(&self, account: &str) -> Result<Profile, SourceError> {
        Ok(Profile {
            login: account.to_string(),
            ..Default::default()
        })
    }

    async fn fetch_repositories(&self, _account: &str) -> Result<Vec<Repository>, SourceError> {
        Err(SourceError::Network("connection refused".to_string()))
    }
}
