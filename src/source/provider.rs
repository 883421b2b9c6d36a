use std::fmt;

use async_trait::async_trait;
use log::info;

use super::types::{Profile, Repository};

/// Errors that can occur while fetching portfolio data.
#[derive(Debug)]
pub enum SourceError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// API returned a non-success status.
    Api { status: u16, message: String },
    /// The body was not the JSON shape we expected.
    Parse(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Network(msg) => write!(f, "network error: {msg}"),
            SourceError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            SourceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Returns the name of the source.
    fn name(&self) -> &str;

    /// Fetches the public profile of `account`.
    async fn fetch_profile(&self, account: &str) -> Result<Profile, SourceError>;

    /// Fetches the first page of `account`'s public repositories.
    async fn fetch_repositories(&self, account: &str) -> Result<Vec<Repository>, SourceError>;
}

/// Everything the portfolio script is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Portfolio {
    pub profile: Profile,
    pub repositories: Vec<Repository>,
}

/// Fetches profile and repositories concurrently. Either failure fails the
/// whole load; nothing is rendered from a half-loaded portfolio.
pub async fn load_portfolio(
    source: &dyn ProfileSource,
    account: &str,
) -> Result<Portfolio, SourceError> {
    let (profile, repositories) = futures::try_join!(
        source.fetch_profile(account),
        source.fetch_repositories(account)
    )?;
    info!(
        "Loaded portfolio for {} from {}: {} repositories",
        account,
        source.name(),
        repositories.len()
    );
    Ok(Portfolio {
        profile,
        repositories,
    })
}
