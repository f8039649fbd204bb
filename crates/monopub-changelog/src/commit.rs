use std::sync::LazyLock;

use regex::Regex;

static HEADER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^)]*)\))?(?P<bang>!)?:\s*(?P<subject>\S.*)$").ok()
});

const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// A commit whose header follows `type(scope)!: subject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalCommit {
    pub sha: String,
    pub kind: String,
    pub scope: Option<String>,
    pub subject: String,
    pub breaking: bool,
}

impl ConventionalCommit {
    /// Returns `None` for messages that do not follow the convention.
    #[must_use]
    pub fn parse(sha: &str, message: &str) -> Option<Self> {
        let header = message.lines().next()?.trim();
        let captures = HEADER.as_ref()?.captures(header)?;

        let scope = captures
            .name("scope")
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty());
        let breaking = captures.name("bang").is_some()
            || message
                .lines()
                .skip(1)
                .any(|line| BREAKING_FOOTERS.iter().any(|f| line.trim_start().starts_with(f)));

        Some(Self {
            sha: sha.to_string(),
            kind: captures["type"].to_ascii_lowercase(),
            scope,
            subject: captures["subject"].trim().to_string(),
            breaking,
        })
    }

    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }
}
