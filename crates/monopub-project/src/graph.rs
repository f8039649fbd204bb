use std::collections::{BTreeSet, HashMap, HashSet};

use monopub_core::{DependencyKind, PackageInfo};
use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

/// Workspace packages with `dependent -> dependency` edges for every local
/// `dependencies`/`devDependencies` entry. Peer dependencies add no edges.
#[derive(Debug, Clone)]
pub struct PackageGraph {
    graph: DiGraph<PackageInfo, DependencyKind>,
    index: HashMap<String, NodeIndex>,
}

impl PackageGraph {
    #[must_use]
    pub fn new(packages: Vec<PackageInfo>) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for package in packages {
            let name = package.name.clone();
            let idx = graph.add_node(package);
            index.insert(name, idx);
        }

        let nodes: Vec<NodeIndex> = graph.node_indices().collect();
        for dependent in nodes {
            let mut edges = Vec::new();
            for kind in DependencyKind::PROPAGATING {
                for dependency in graph[dependent].ranges(kind).keys() {
                    if let Some(&target) = index.get(dependency) {
                        if target != dependent {
                            edges.push((target, kind));
                        }
                    }
                }
            }
            for (target, kind) in edges {
                graph.update_edge(dependent, target, kind);
            }
        }

        Self { graph, index }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PackageInfo> {
        self.index.get(name).map(|&idx| &self.graph[idx])
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageInfo> {
        self.graph.node_weights()
    }

    /// Local packages that list `name` in `dependencies` or `devDependencies`.
    #[must_use]
    pub fn dependents_of(&self, name: &str) -> Vec<&PackageInfo> {
        let Some(&idx) = self.index.get(name) else {
            return Vec::new();
        };
        let mut dependents: Vec<&PackageInfo> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| &self.graph[n])
            .collect();
        dependents.sort_by(|a, b| a.name.cmp(&b.name));
        dependents
    }

    /// Every package that reaches one of `seeds` by following dependency edges
    /// backwards. Seeds are not part of the result unless a cycle leads back to them.
    #[must_use]
    pub fn transitive_dependents(&self, seeds: &BTreeSet<String>) -> BTreeSet<String> {
        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut stack: Vec<NodeIndex> = seeds
            .iter()
            .filter_map(|name| self.index.get(name).copied())
            .collect();
        let mut dependents = BTreeSet::new();

        while let Some(idx) = stack.pop() {
            for neighbor in self.graph.neighbors_directed(idx, Direction::Incoming) {
                dependents.insert(self.graph[neighbor].name.clone());
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        dependents
    }

    /// Packages grouped into strongly connected units, dependencies first.
    ///
    /// Acyclic packages form single-member units; members of a cycle share
    /// one unit, sorted by name.
    #[must_use]
    pub fn topological_units(&self) -> Vec<Vec<&PackageInfo>> {
        tarjan_scc(&self.graph)
            .into_iter()
            .map(|component| {
                let mut unit: Vec<&PackageInfo> =
                    component.into_iter().map(|idx| &self.graph[idx]).collect();
                unit.sort_by(|a, b| a.name.cmp(&b.name));
                unit
            })
            .collect()
    }

    /// Flattened [`Self::topological_units`].
    #[must_use]
    pub fn topological_order(&self) -> Vec<&PackageInfo> {
        self.topological_units().into_iter().flatten().collect()
    }

    /// Names of packages taking part in a dependency cycle, one list per cycle.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.topological_units()
            .into_iter()
            .filter(|unit| unit.len() > 1)
            .map(|unit| unit.into_iter().map(|p| p.name.clone()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn package(name: &str, deps: &[&str], dev: &[&str], peer: &[&str]) -> PackageInfo {
        let mut info = PackageInfo::new(name, Version::new(1, 0, 0), format!("/ws/packages/{name}"));
        for dep in deps {
            info.dependencies.insert((*dep).to_string(), "^1.0.0".to_string());
        }
        for dep in dev {
            info.dev_dependencies.insert((*dep).to_string(), "^1.0.0".to_string());
        }
        for dep in peer {
            info.peer_dependencies.insert((*dep).to_string(), "^1.0.0".to_string());
        }
        info
    }

    fn names(packages: &[&PackageInfo]) -> Vec<String> {
        packages.iter().map(|p| p.name.clone()).collect()
    }

    fn seeds(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn dependencies_come_first() {
        let graph = PackageGraph::new(vec![
            package("app", &["lib"], &[], &[]),
            package("lib", &["util"], &[], &[]),
            package("util", &[], &[], &[]),
        ]);

        assert_eq!(names(&graph.topological_order()), ["util", "lib", "app"]);
    }

    #[test]
    fn external_dependencies_add_no_edges() {
        let graph = PackageGraph::new(vec![package("a", &["lodash"], &[], &[])]);
        assert!(graph.dependents_of("lodash").is_empty());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn dev_dependencies_propagate_but_peers_do_not() {
        let graph = PackageGraph::new(vec![
            package("core", &[], &[], &[]),
            package("tests", &[], &["core"], &[]),
            package("plugin", &[], &[], &["core"]),
        ]);

        let dependents = graph.transitive_dependents(&seeds(&["core"]));
        assert_eq!(dependents, seeds(&["tests"]));
    }

    #[test]
    fn transitive_dependents_follow_chains() {
        let graph = PackageGraph::new(vec![
            package("a", &[], &[], &[]),
            package("b", &["a"], &[], &[]),
            package("c", &["b"], &[], &[]),
            package("d", &[], &[], &[]),
        ]);

        assert_eq!(graph.transitive_dependents(&seeds(&["a"])), seeds(&["b", "c"]));
        assert!(graph.transitive_dependents(&seeds(&["c"])).is_empty());
    }

    #[test]
    fn cycles_terminate_and_form_one_unit() {
        let graph = PackageGraph::new(vec![
            package("z", &["y"], &[], &[]),
            package("y", &["z"], &[], &[]),
            package("base", &[], &[], &[]),
            package("top", &["z"], &[], &[]),
        ]);

        assert_eq!(graph.cycles(), vec![vec!["y".to_string(), "z".to_string()]]);

        let order = names(&graph.topological_order());
        let top = order.iter().position(|n| n == "top");
        let y = order.iter().position(|n| n == "y");
        assert!(y < top);

        let dependents = graph.transitive_dependents(&seeds(&["y"]));
        assert_eq!(dependents, seeds(&["top", "y", "z"]));
    }

    #[test]
    fn self_dependency_is_ignored() {
        let graph = PackageGraph::new(vec![package("a", &["a"], &[], &[])]);
        assert!(graph.cycles().is_empty());
        assert!(graph.transitive_dependents(&seeds(&["a"])).is_empty());
    }
}
