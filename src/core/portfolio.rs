//! # Portfolio Script
//!
//! The fixed session termfolio plays back. Data comes from a loaded
//! [`Portfolio`]; the shape of the session never changes:
//!
//! ```text
//! ~/$ cd profile
//! ~/profile$ cat aboutMe.txt            → bio
//! ~/profile$ view profilePicture.png    → avatar
//! ~/profile$ tree sites                 → configured sites
//! ~/profile$ cd repos
//! ~/profile/repos$ ls | progress --to 30 → n/30, percent
//! ~/profile/repos$ tree                 → repositories
//! ~/profile/repos$ exit                 → logout
//! ```

use crate::core::render::Image;
use crate::core::script::Step;
use crate::core::tree::TreeEntry;
use crate::source::Portfolio;
use crate::source::github::DEFAULT_PAGE_SIZE;

pub const AVATAR_SIZE: u16 = 100;
pub const AVATAR_ALT: &str = "profile picture";

/// Sites listed by `tree sites` when none are configured. The GitHub entry
/// points at the profile page the API reported, if any.
pub fn default_sites(account: &str, profile_url: Option<&str>) -> Vec<TreeEntry> {
    let github = profile_url
        .map(str::to_string)
        .unwrap_or_else(|| format!("https://github.com/{account}"));
    vec![
        TreeEntry::plain("Home"),
        TreeEntry::link("Blog", "/blog"),
        TreeEntry::link("GitHub", github),
        TreeEntry::link("Scratch", "https://scratch.mit.edu/users/NFlex23"),
    ]
}

/// `"<count>/30\n<percent>%"`, percent rounded to the nearest integer.
pub fn progress_text(count: usize) -> String {
    let percent = (count as f64 / DEFAULT_PAGE_SIZE as f64 * 100.0).round();
    format!("{count}/{DEFAULT_PAGE_SIZE}\n{percent}%")
}

pub fn build_script(portfolio: &Portfolio, sites: &[TreeEntry]) -> Vec<Step> {
    let profile = &portfolio.profile;
    let repos: Vec<TreeEntry> = portfolio
        .repositories
        .iter()
        .map(|repo| TreeEntry {
            name: repo.name.clone(),
            url: repo.html_url.clone(),
        })
        .collect();

    vec![
        Step::NewLine,
        Step::type_text("cd profile"),
        Step::change_dir("~/profile"),
        Step::NewLine,
        Step::type_text("cat aboutMe.txt"),
        Step::output(profile.bio.clone().unwrap_or_default()),
        Step::NewLine,
        Step::type_text("view profilePicture.png"),
        Step::ShowImage(Image {
            src: profile.avatar_url.clone().unwrap_or_default(),
            alt: AVATAR_ALT.to_string(),
            width: AVATAR_SIZE,
            height: AVATAR_SIZE,
        }),
        Step::NewLine,
        Step::type_text("tree sites"),
        Step::tree("~/sites", sites.to_vec()),
        Step::NewLine,
        Step::type_text("cd repos"),
        Step::change_dir("~/profile/repos"),
        Step::NewLine,
        Step::type_text(format!("ls | progress --to {DEFAULT_PAGE_SIZE}")),
        Step::output(progress_text(portfolio.repositories.len())),
        Step::NewLine,
        Step::type_text("tree"),
        Step::tree("./repos/", repos),
        Step::NewLine,
        Step::type_text("exit"),
        Step::output("logout"),
    ]
}
