pub mod github;
pub mod provider;
pub mod types;

pub use github::GitHubSource;
pub use provider::{Portfolio, ProfileSource, SourceError, load_portfolio};
pub use types::{Profile, Repository};
