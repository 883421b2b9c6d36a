//! Box-drawing directory listings.
//!
//! ```text
//! ~/sites
//! ├── Home
//! └── Blog
//! ```

use serde::{Deserialize, Serialize};

use crate::core::render::Fragment;

pub const BRANCH: &str = "├── ";
pub const LAST_BRANCH: &str = "└── ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl TreeEntry {
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }

    pub fn link(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
        }
    }
}

/// Lays out `dir` followed by one row per entry, in the given order.
///
/// The last row gets [`LAST_BRANCH`], every other row [`BRANCH`]. Two
/// trailing breaks leave a blank line under the listing.
pub fn tree_fragments(dir: &str, entries: &[TreeEntry]) -> Vec<Fragment> {
    let mut out = vec![Fragment::text(dir), Fragment::Break];

    for (i, entry) in entries.iter().enumerate() {
        let is_last = i + 1 == entries.len();
        out.push(Fragment::text(if is_last { LAST_BRANCH } else { BRANCH }));
        out.push(match &entry.url {
            Some(url) => Fragment::link(&entry.name, url),
            None => Fragment::text(&entry.name),
        });
        if !is_last {
            out.push(Fragment::Break);
        }
    }

    out.push(Fragment::Break);
    out.push(Fragment::Break);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connectors(fragments: &[Fragment]) -> Vec<&str> {
        fragments
            .iter()
            .filter_map(|f| match f {
                Fragment::Text(t) if t == BRANCH || t == LAST_BRANCH => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_two_entries_with_link() {
        let entries = [TreeEntry::plain("Home"), TreeEntry::link("Blog", "/blog")];
        let fragments = tree_fragments("~/sites", &entries);
        assert_eq!(
            fragments,
            vec![
                Fragment::text("~/sites"),
                Fragment::Break,
                Fragment::text("├── "),
                Fragment::text("Home"),
                Fragment::Break,
                Fragment::text("└── "),
                Fragment::link("Blog", "/blog"),
                Fragment::Break,
                Fragment::Break,
            ]
        );
    }

    #[test]
    fn test_only_last_entry_uses_terminal_connector() {
        let entries: Vec<TreeEntry> = (0..5).map(|i| TreeEntry::plain(format!("e{i}"))).collect();
        let fragments = tree_fragments(".", &entries);
        assert_eq!(
            connectors(&fragments),
            vec![BRANCH, BRANCH, BRANCH, BRANCH, LAST_BRANCH]
        );
    }

    #[test]
    fn test_single_entry_is_terminal() {
        let fragments = tree_fragments(".", &[TreeEntry::plain("only")]);
        assert_eq!(connectors(&fragments), vec![LAST_BRANCH]);
    }

    #[test]
    fn test_empty_list_is_label_only() {
        let fragments = tree_fragments("./repos/", &[]);
        assert_eq!(
            fragments,
            vec![
                Fragment::text("./repos/"),
                Fragment::Break,
                Fragment::Break,
                Fragment::Break,
            ]
        );
    }

    #[test]
    fn test_entry_deserializes_without_url() {
        let entry: TreeEntry = toml::from_str(r#"name = "Home""#).unwrap();
        assert_eq!(entry, TreeEntry::plain("Home"));
    }
}
