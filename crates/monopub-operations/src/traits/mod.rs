mod conventional_commits;
mod git_provider;
mod interaction;
mod manifest_writer;
mod project_provider;
mod registry_client;

pub use conventional_commits::{ConventionalCommits, ConventionalContext};
pub use git_provider::GitProvider;
pub use interaction::InteractionProvider;
pub use manifest_writer::ManifestWriter;
pub use project_provider::ProjectProvider;
pub use registry_client::RegistryClient;
