mod config;
mod error;
mod graph;
mod project;

pub const ROOT_CONFIG_FILE: &str = "monopub.json";
pub const DEFAULT_PACKAGE_GLOB: &str = "packages/*";

pub use config::{AllowBranch, PublishConfig, RootConfig, parse_root_config};
pub use error::ProjectError;
pub use graph::PackageGraph;
pub use project::{Workspace, discover_workspace};

pub type Result<T> = std::result::Result<T, ProjectError>;
