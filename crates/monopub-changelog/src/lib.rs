mod changelog;
mod commit;
mod error;
mod format;
mod preset;
mod recommend;

pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

pub use changelog::Changelog;
pub use commit::ConventionalCommit;
pub use error::ChangelogError;
pub use format::{ReleaseNotes, format_release, new_changelog};
pub use preset::{ChangelogPreset, Section};
pub use recommend::recommend_bump;

pub type Result<T> = std::result::Result<T, ChangelogError>;
