use std::collections::HashMap;
use std::path::{Path, PathBuf};

use monopub_core::PackageInfo;
use monopub_manifest::PackageManifest;

use crate::ROOT_CONFIG_FILE;
use crate::config::{RootConfig, parse_root_config};
use crate::error::ProjectError;
use crate::graph::PackageGraph;

const PACKAGE_MANIFEST_FILE: &str = "package.json";

/// A discovered workspace: its root, parsed configuration and packages.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub config: RootConfig,
    pub packages: Vec<PackageInfo>,
}

impl Workspace {
    #[must_use]
    pub fn graph(&self) -> PackageGraph {
        PackageGraph::new(self.packages.clone())
    }

    /// Pathspec matching every package manifest, relative to the root.
    #[must_use]
    pub fn manifest_pathspecs(&self) -> Vec<String> {
        self.config
            .package_globs()
            .iter()
            .map(|pattern| format!("{}/{PACKAGE_MANIFEST_FILE}", pattern.trim_end_matches('/')))
            .collect()
    }
}

/// Walks up from `start_dir` to the nearest `monopub.json` and loads every
/// package matched by its `packages` globs.
///
/// # Errors
///
/// Returns `ProjectError::NotFound` if no configuration file exists above
/// `start_dir`, or an error if a configuration or manifest cannot be parsed.
pub fn discover_workspace(start_dir: &Path) -> Result<Workspace, ProjectError> {
    let start_dir = start_dir
        .canonicalize()
        .map_err(|source| ProjectError::ConfigRead {
            path: start_dir.to_path_buf(),
            source,
        })?;

    let root = find_workspace_root(&start_dir)?;
    let config_path = root.join(ROOT_CONFIG_FILE);
    let content =
        std::fs::read_to_string(&config_path).map_err(|source| ProjectError::ConfigRead {
            path: config_path.clone(),
            source,
        })?;
    let config = parse_root_config(&config_path, &content)?;
    let packages = collect_packages(&root, config.package_globs())?;

    Ok(Workspace {
        root,
        config_path,
        config,
        packages,
    })
}

fn find_workspace_root(start_dir: &Path) -> Result<PathBuf, ProjectError> {
    start_dir
        .ancestors()
        .find(|dir| dir.join(ROOT_CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| ProjectError::NotFound {
            start_dir: start_dir.to_path_buf(),
        })
}

fn collect_packages(root: &Path, globs: &[String]) -> Result<Vec<PackageInfo>, ProjectError> {
    let mut packages: Vec<PackageInfo> = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for pattern in globs {
        let full_pattern = root.join(pattern).to_string_lossy().into_owned();
        let entries = glob::glob(&full_pattern).map_err(|source| ProjectError::GlobPattern {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in entries {
            let dir = entry?;
            let manifest_path = dir.join(PACKAGE_MANIFEST_FILE);
            if !dir.is_dir() || !manifest_path.is_file() {
                continue;
            }

            let info = PackageManifest::load(&manifest_path)?.to_package_info()?;

            if let Some(first) = seen.get(&info.name) {
                if *first == info.directory {
                    continue;
                }
                return Err(ProjectError::DuplicatePackage {
                    name: info.name,
                    first: first.clone(),
                    second: info.directory,
                });
            }

            seen.insert(info.name.clone(), info.directory.clone());
            packages.push(info);
        }
    }

    Ok(packages)
}
