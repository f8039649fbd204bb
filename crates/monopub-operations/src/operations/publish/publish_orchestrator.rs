use std::sync::{Mutex, PoisonError};

use monopub_core::PackageInfo;
use monopub_project::PackageGraph;
use monopub_version::{is_prerelease, prerelease_tag};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use semver::Version;
use tracing::{debug, info, warn};

use super::options::IgnoreMatcher;
use crate::Result;
use crate::traits::RegistryClient;
use crate::types::{PublishTarget, ReleasePlan};

/// Placeholder dist-tag used while a temp-tag batch is in flight.
pub const TEMP_DIST_TAG: &str = "monopub-temp";

const LIFECYCLE_SCRIPTS: [&str; 3] = ["preversion", "version", "postversion"];

const CANARY_DIST_TAG: &str = "canary";
const DEFAULT_DIST_TAG: &str = "latest";

/// Dist-tag settings that apply to the whole batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistTagOptions<'a> {
    pub npm_tag: Option<&'a str>,
    pub pre_dist_tag: Option<&'a str>,
    pub canary: bool,
}

/// Explicit tag, then `canary`, then the prerelease tag, then `latest`.
#[must_use]
pub fn resolve_dist_tag(version: &Version, options: &DistTagOptions<'_>) -> String {
    if let Some(tag) = options.npm_tag {
        return tag.to_string();
    }
    if options.canary {
        return CANARY_DIST_TAG.to_string();
    }
    if is_prerelease(version) {
        if let Some(tag) = options.pre_dist_tag {
            return tag.to_string();
        }
        if let Some(tag) = prerelease_tag(version) {
            return tag;
        }
    }
    DEFAULT_DIST_TAG.to_string()
}

/// Publishable packages of `plan` in release order. Private and ignored
/// packages are versioned but never published.
#[must_use]
pub fn publish_targets(
    plan: &ReleasePlan,
    graph: &PackageGraph,
    ignore: &IgnoreMatcher,
    dist_tags: &DistTagOptions<'_>,
    registry: Option<&str>,
) -> Vec<PublishTarget> {
    plan.versions
        .iter()
        .filter_map(|(name, version)| {
            let package = graph.get(name)?;
            if package.private {
                debug!(package = %name, "skipping private package");
                return None;
            }
            if ignore.is_ignored(name) {
                debug!(package = %name, "skipping ignored package");
                return None;
            }
            Some(PublishTarget {
                package: name.clone(),
                version: version.clone(),
                directory: package.directory.clone(),
                dist_tag: resolve_dist_tag(version, dist_tags),
                registry: registry.map(String::from),
            })
        })
        .collect()
}

pub struct PublishOrchestrator<'a, R> {
    registry: &'a R,
    concurrency: usize,
    temp_tag: bool,
}

impl<'a, R> PublishOrchestrator<'a, R>
where
    R: RegistryClient,
{
    pub fn new(registry: &'a R, concurrency: usize, temp_tag: bool) -> Self {
        Self {
            registry,
            concurrency,
            temp_tag,
        }
    }

    /// Runs `preversion`, `version` and `postversion` for each package, in order.
    /// Scripts a package does not declare are skipped.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::LifecycleScript` for the first failing script.
    pub fn run_lifecycle(&self, packages: &[&PackageInfo]) -> Result<()> {
        for package in packages {
            for script in LIFECYCLE_SCRIPTS {
                if !package.has_script(script) {
                    continue;
                }
                info!(package = %package.name, script, "running lifecycle script");
                self.registry.run_lifecycle_script(package, script)?;
            }
        }
        Ok(())
    }

    /// Publishes `targets` on a bounded worker pool. With temp tags, every
    /// package goes out under [`TEMP_DIST_TAG`] first and is moved to its
    /// real dist-tag one by one once the whole batch has succeeded.
    ///
    /// # Errors
    ///
    /// Returns the first registry failure. Packages already published stay
    /// published.
    pub fn publish(&self, targets: &[PublishTarget]) -> Result<()> {
        if targets.is_empty() {
            info!("nothing to publish");
            return Ok(());
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(self.concurrency)
            .thread_name(|index| format!("monopub-publish-{index}"))
            .build()?;
        let published = Mutex::new(Vec::with_capacity(targets.len()));

        let batch = pool.install(|| {
            targets.par_iter().try_for_each(|target| {
                let tag = if self.temp_tag {
                    TEMP_DIST_TAG
                } else {
                    target.dist_tag.as_str()
                };
                self.registry.publish(target, tag)?;
                info!(package = %target.package, version = %target.version, tag, "published");
                published
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(target.package.clone());
                Ok(())
            })
        });

        if let Err(err) = batch {
            let done = published
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner);
            if !done.is_empty() {
                warn!(published = ?done, "publish batch failed; already published packages are not retracted");
            }
            return Err(err);
        }

        if self.temp_tag {
            self.swap_temp_tags(targets)?;
        }
        Ok(())
    }

    fn swap_temp_tags(&self, targets: &[PublishTarget]) -> Result<()> {
        for target in targets {
            if self.registry.dist_tag_exists(target, TEMP_DIST_TAG)? {
                self.registry.remove_dist_tag(target, TEMP_DIST_TAG)?;
            }
            self.registry.add_dist_tag(target, &target.dist_tag)?;
            debug!(package = %target.package, tag = %target.dist_tag, "moved dist-tag from placeholder");
        }
        info!(count = targets.len(), "promoted temp-tagged packages");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockRegistryClient, RegistryCall};
    use crate::{OperationError, RegistryAction};
    use indexmap::IndexMap;
    use monopub_core::ReleaseMode;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    /// Holds every publish open for a moment and counts overlapping calls.
    #[derive(Default)]
    struct SlowRegistry {
        failing: Option<&'static str>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    impl SlowRegistry {
        fn failing(package: &'static str) -> Self {
            Self {
                failing: Some(package),
                ..Self::default()
            }
        }
    }

    impl RegistryClient for SlowRegistry {
        fn publish(&self, target: &PublishTarget, _dist_tag: &str) -> Result<()> {
            self.started.fetch_add(1, Ordering::SeqCst);
            if self.failing == Some(target.package.as_str()) {
                return Err(OperationError::Registry {
                    package: target.package.clone(),
                    action: RegistryAction::Publish,
                    message: "E500 internal".to_string(),
                });
            }
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(30));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn dist_tag_exists(&self, _target: &PublishTarget, _dist_tag: &str) -> Result<bool> {
            Ok(false)
        }

        fn remove_dist_tag(&self, _target: &PublishTarget, _dist_tag: &str) -> Result<()> {
            Ok(())
        }

        fn add_dist_tag(&self, _target: &PublishTarget, _dist_tag: &str) -> Result<()> {
            Ok(())
        }

        fn run_lifecycle_script(&self, _package: &PackageInfo, _script: &str) -> Result<()> {
            Ok(())
        }
    }

    fn numbered_targets(count: usize) -> Vec<PublishTarget> {
        (0..count)
            .map(|i| target(&format!("pkg-{i}"), "1.0.0", "latest"))
            .collect()
    }

    fn v(s: &str) -> Version {
        Version::parse(s).expect("valid version")
    }

    fn target(name: &str, version: &str, tag: &str) -> PublishTarget {
        PublishTarget {
            package: name.to_string(),
            version: v(version),
            directory: PathBuf::from(format!("/ws/packages/{name}")),
            dist_tag: tag.to_string(),
            registry: None,
        }
    }

    #[test]
    fn dist_tag_precedence() {
        let stable = v("1.0.0");
        let beta = v("2.0.0-beta.3");

        assert_eq!(resolve_dist_tag(&stable, &DistTagOptions::default()), "latest");
        assert_eq!(resolve_dist_tag(&beta, &DistTagOptions::default()), "beta");
        assert_eq!(
            resolve_dist_tag(
                &beta,
                &DistTagOptions {
                    pre_dist_tag: Some("next"),
                    ..DistTagOptions::default()
                }
            ),
            "next"
        );
        assert_eq!(
            resolve_dist_tag(
                &v("1.0.1-alpha.abc1234"),
                &DistTagOptions {
                    canary: true,
                    pre_dist_tag: Some("next"),
                    ..DistTagOptions::default()
                }
            ),
            "canary"
        );
        assert_eq!(
            resolve_dist_tag(
                &beta,
                &DistTagOptions {
                    npm_tag: Some("experimental"),
                    canary: true,
                    ..DistTagOptions::default()
                }
            ),
            "experimental"
        );
    }

    #[test]
    fn private_and_ignored_packages_are_not_targets() -> anyhow::Result<()> {
        let mut private = PackageInfo::new("private", v("1.0.0"), "/ws/packages/private");
        private.private = true;
        let graph = PackageGraph::new(vec![
            PackageInfo::new("a", v("1.0.0"), "/ws/packages/a"),
            PackageInfo::new("docs", v("1.0.0"), "/ws/packages/docs"),
            private,
        ]);
        let plan = ReleasePlan {
            mode: ReleaseMode::Fixed,
            versions: ["a", "docs", "private"]
                .iter()
                .map(|n| ((*n).to_string(), v("1.1.0")))
                .collect::<IndexMap<_, _>>(),
            repo_version: Some(v("1.1.0")),
            meta_suffix: None,
        };
        let ignore = IgnoreMatcher::new(&["docs".to_string()])?;

        let targets = publish_targets(
            &plan,
            &graph,
            &ignore,
            &DistTagOptions::default(),
            Some("https://registry.example.com"),
        );

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].package, "a");
        assert_eq!(targets[0].dist_tag, "latest");
        assert_eq!(
            targets[0].registry.as_deref(),
            Some("https://registry.example.com")
        );
        Ok(())
    }

    #[test]
    fn lifecycle_scripts_run_in_order_and_skip_missing() -> anyhow::Result<()> {
        let registry = MockRegistryClient::new();
        let mut a = PackageInfo::new("a", v("1.0.0"), "/ws/packages/a");
        a.lifecycle_scripts.insert("postversion".to_string());
        a.lifecycle_scripts.insert("preversion".to_string());
        let b = PackageInfo::new("b", v("1.0.0"), "/ws/packages/b");

        PublishOrchestrator::new(&registry, 1, false).run_lifecycle(&[&a, &b])?;

        assert_eq!(
            registry.calls(),
            vec![
                RegistryCall::Script("a".to_string(), "preversion".to_string()),
                RegistryCall::Script("a".to_string(), "postversion".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn failing_script_halts() {
        let registry = MockRegistryClient::new().with_failing_script("a", "version");
        let mut a = PackageInfo::new("a", v("1.0.0"), "/ws/packages/a");
        a.lifecycle_scripts.insert("version".to_string());
        a.lifecycle_scripts.insert("postversion".to_string());

        let result = PublishOrchestrator::new(&registry, 1, false).run_lifecycle(&[&a]);

        assert!(matches!(result, Err(OperationError::LifecycleScript { .. })));
        assert_eq!(registry.calls().len(), 1);
    }

    #[test]
    fn direct_publish_uses_resolved_tags() -> anyhow::Result<()> {
        let registry = MockRegistryClient::new();
        let targets = [target("a", "1.0.1", "latest"), target("b", "2.0.0-rc.1", "rc")];

        PublishOrchestrator::new(&registry, 2, false).publish(&targets)?;

        let mut published = registry.published();
        published.sort();
        assert_eq!(
            published,
            vec![
                ("a@1.0.1".to_string(), "latest".to_string()),
                ("b@2.0.0-rc.1".to_string(), "rc".to_string()),
            ]
        );
        assert!(registry.dist_tag_changes().is_empty());
        Ok(())
    }

    #[test]
    fn temp_tag_publishes_under_placeholder_then_swaps() -> anyhow::Result<()> {
        let registry = MockRegistryClient::new();
        let targets = [target("a", "1.0.1", "latest"), target("b", "1.0.1", "latest")];

        PublishOrchestrator::new(&registry, 2, true).publish(&targets)?;

        assert!(registry.published().iter().all(|(_, tag)| tag == TEMP_DIST_TAG));
        assert_eq!(
            registry.dist_tag_changes(),
            vec![
                RegistryCall::RemoveDistTag("a@1.0.1".to_string(), TEMP_DIST_TAG.to_string()),
                RegistryCall::AddDistTag("a@1.0.1".to_string(), "latest".to_string()),
                RegistryCall::RemoveDistTag("b@1.0.1".to_string(), TEMP_DIST_TAG.to_string()),
                RegistryCall::AddDistTag("b@1.0.1".to_string(), "latest".to_string()),
            ]
        );
        Ok(())
    }

    #[test]
    fn failed_batch_skips_tag_swap() {
        let registry = MockRegistryClient::new().with_failing_publish("b");
        let targets = [target("a", "1.0.1", "latest"), target("b", "1.0.1", "latest")];

        let result = PublishOrchestrator::new(&registry, 1, true).publish(&targets);

        assert!(matches!(
            result,
            Err(OperationError::Registry {
                action: RegistryAction::Publish,
                ..
            })
        ));
        assert!(registry.dist_tag_changes().is_empty());
    }

    #[test]
    fn publishes_never_exceed_concurrency() -> anyhow::Result<()> {
        let registry = SlowRegistry::default();
        let targets = numbered_targets(6);

        PublishOrchestrator::new(&registry, 2, false).publish(&targets)?;

        assert_eq!(registry.finished.load(Ordering::SeqCst), 6);
        let peak = registry.peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak in-flight publishes was {peak}");
        Ok(())
    }

    #[test]
    fn failure_waits_for_in_flight_publishes() {
        let registry = SlowRegistry::failing("pkg-0");
        let targets = numbered_targets(4);

        let result = PublishOrchestrator::new(&registry, 4, false).publish(&targets);

        assert!(matches!(
            result,
            Err(OperationError::Registry { ref package, .. }) if package == "pkg-0"
        ));
        assert_eq!(registry.in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(
            registry.finished.load(Ordering::SeqCst),
            registry.started.load(Ordering::SeqCst) - 1
        );
    }

    #[test]
    fn empty_batch_is_a_no_op() -> anyhow::Result<()> {
        let registry = MockRegistryClient::new();

        PublishOrchestrator::new(&registry, 4, true).publish(&[])?;

        assert!(registry.calls().is_empty());
        Ok(())
    }
}
