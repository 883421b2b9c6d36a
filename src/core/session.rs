//! # Session State
//!
//! What the fake prompt shows in front of every line: `user@host:dir$ `.
//! Only lines created after a change pick up the new values.

pub const DEFAULT_USER: &str = "mystpi";
pub const DEFAULT_HOST: &str = "laptop";
pub const DEFAULT_DIR: &str = "~/";
pub const DEFAULT_CURSOR: &str = "█";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: String,
    pub host: String,
    pub dir: String,
    pub cursor: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            host: DEFAULT_HOST.to_string(),
            dir: DEFAULT_DIR.to_string(),
            cursor: DEFAULT_CURSOR.to_string(),
        }
    }
}

impl Session {
    /// `user@host`, the green part of the prefix.
    pub fn identity(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    /// The full prefix as plain text, e.g. `mystpi@laptop:~/$ `.
    pub fn prefix(&self) -> String {
        format!("{}:{}$ ", self.identity(), self.dir)
    }
}
