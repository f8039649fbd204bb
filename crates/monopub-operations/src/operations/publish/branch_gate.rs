use globset::{Glob, GlobSet, GlobSetBuilder};
use monopub_project::AllowBranch;
use tracing::{debug, info};

use crate::Result;
use crate::error::{OperationError, ValidationError};

/// Branches allowed to publish. An empty list allows every branch.
#[derive(Debug, Clone)]
pub struct BranchGate {
    patterns: Vec<String>,
    matcher: GlobSet,
}

impl BranchGate {
    /// Command-line patterns replace the persisted list entirely when any are given.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::BranchPattern` for a malformed glob.
    pub fn new(
        cli: &[String],
        persisted: Option<&AllowBranch>,
    ) -> std::result::Result<Self, ValidationError> {
        let patterns = if cli.is_empty() {
            persisted.map(AllowBranch::patterns).unwrap_or_default()
        } else {
            cli.to_vec()
        };

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|source| ValidationError::BranchPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let matcher = builder
            .build()
            .map_err(|source| ValidationError::BranchPattern {
                pattern: patterns.join(", "),
                source,
            })?;

        Ok(Self { patterns, matcher })
    }

    #[must_use]
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    #[must_use]
    pub fn is_allowed(&self, branch: &str) -> bool {
        self.patterns.is_empty()
            || self.patterns.iter().any(|p| p == branch)
            || self.matcher.is_match(branch)
    }

    /// # Errors
    ///
    /// Returns `OperationError::BranchRestricted` when `branch` matches no pattern.
    /// Canary releases are never restricted.
    pub fn check(&self, branch: &str, canary: bool) -> Result<()> {
        if canary {
            debug!(branch, "canary release, skipping branch check");
            return Ok(());
        }
        if self.is_allowed(branch) {
            info!(branch, "branch allowed to publish");
            return Ok(());
        }
        Err(OperationError::BranchRestricted {
            branch: branch.to_string(),
            allowed: self.patterns.join(", "),
        })
    }
}

impl Default for BranchGate {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: GlobSet::empty(),
        }
    }
}
