mod conventional;
mod git;
mod manifest;
mod npm;
mod project;

pub use conventional::ConventionalChangelogProvider;
pub use git::Git2Provider;
pub use manifest::FileSystemManifestWriter;
pub use npm::NpmRegistryClient;
pub use project::FileSystemProjectProvider;
