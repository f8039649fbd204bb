use std::collections::BTreeSet;
use std::path::Path;

use monopub_core::{PackageInfo, ReleaseMode};
use monopub_project::PackageGraph;
use tracing::{debug, info};

use super::options::IgnoreMatcher;
use crate::Result;
use crate::traits::GitProvider;

/// Glob used to find the previous release tag.
#[must_use]
pub fn release_tag_pattern(mode: ReleaseMode) -> &'static str {
    match mode {
        ReleaseMode::Fixed => "v*",
        ReleaseMode::Independent => "*@*",
    }
}

/// Inputs that decide which packages are release candidates.
#[derive(Debug, Clone, Copy)]
pub struct DetectOptions<'a> {
    pub last_tag: Option<&'a str>,
    pub ignore: &'a IgnoreMatcher,
    /// Adds packages whose current version is a prerelease.
    pub sweep_prereleases: bool,
}

pub struct ChangeSetDetector<'a, G> {
    git: &'a G,
    project_root: &'a Path,
}

impl<'a, G> ChangeSetDetector<'a, G>
where
    G: GitProvider,
{
    pub fn new(git: &'a G, project_root: &'a Path) -> Self {
        Self { git, project_root }
    }

    /// Release candidates in dependency-first order. Members of a dependency
    /// cycle are adjacent and sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the changed files since the last tag cannot be listed.
    pub fn detect(
        &self,
        graph: &PackageGraph,
        options: &DetectOptions<'_>,
    ) -> Result<Vec<PackageInfo>> {
        let mut selected = match options.last_tag {
            None => {
                info!("no previous release tag, every package is a candidate");
                graph.packages().map(|p| p.name.clone()).collect()
            }
            Some(tag) => self.changed_since(graph, tag)?,
        };

        if options.sweep_prereleases {
            for package in graph.packages() {
                if !package.version.pre.is_empty() && selected.insert(package.name.clone()) {
                    debug!(package = %package.name, version = %package.version, "including prerelease package");
                }
            }
        }

        let candidates: Vec<PackageInfo> = graph
            .topological_order()
            .into_iter()
            .filter(|p| selected.contains(&p.name))
            .filter(|p| {
                let ignored = options.ignore.is_ignored(&p.name);
                if ignored {
                    debug!(package = %p.name, "ignoring package");
                }
                !ignored
            })
            .cloned()
            .collect();

        info!(count = candidates.len(), "detected release candidates");
        Ok(candidates)
    }

    fn changed_since(&self, graph: &PackageGraph, tag: &str) -> Result<BTreeSet<String>> {
        let mut direct = BTreeSet::new();
        for package in graph.packages() {
            let changes = self
                .git
                .changed_files_since(self.project_root, tag, &package.directory)?;
            if !changes.is_empty() {
                debug!(package = %package.name, files = changes.len(), tag, "package changed");
                direct.insert(package.name.clone());
            }
        }

        let dependents = graph.transitive_dependents(&direct);
        for name in dependents.difference(&direct) {
            debug!(package = %name, "including dependent of changed package");
        }

        direct.extend(dependents);
        Ok(direct)
    }
}
