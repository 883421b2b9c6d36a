//! GitHub REST payloads, trimmed to the fields the portfolio shows.
//!
//! Every field the script reads tolerates absence: an account without a bio
//! or avatar still plays back, it just shows empty content there.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub html_url: Option<String>,
}
