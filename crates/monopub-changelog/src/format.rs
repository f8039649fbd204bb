use std::fmt::Write;

use chrono::NaiveDate;
use semver::Version;

use crate::commit::ConventionalCommit;
use crate::preset::ChangelogPreset;

const CHANGELOG_HEADER: &str = "# Change Log

All notable changes to this project will be documented in this file.
See [Conventional Commits](https://conventionalcommits.org) for commit guidelines.
";

#[must_use]
pub fn new_changelog() -> String {
    CHANGELOG_HEADER.to_string()
}

/// Everything needed to render one release heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseNotes {
    pub version: Version,
    pub date: NaiveDate,
    /// `None` for the workspace-root changelog.
    pub package: Option<String>,
    pub commits: Vec<ConventionalCommit>,
}

#[must_use]
pub fn format_release(notes: &ReleaseNotes, preset: ChangelogPreset) -> String {
    let mut output = format!("## {} ({})\n", notes.version, notes.date.format("%Y-%m-%d"));
    let mut wrote_section = false;

    for section in preset.sections() {
        let entries: Vec<&ConventionalCommit> = notes
            .commits
            .iter()
            .filter(|c| section.kinds.contains(&c.kind.as_str()))
            .collect();
        if entries.is_empty() {
            continue;
        }

        let _ = write!(output, "\n### {}\n\n", section.title);
        for commit in entries {
            push_entry(&mut output, commit);
        }
        wrote_section = true;
    }

    let breaking: Vec<&ConventionalCommit> = notes.commits.iter().filter(|c| c.breaking).collect();
    if !breaking.is_empty() {
        let _ = write!(output, "\n### {}\n\n", preset.breaking_title());
        for commit in breaking {
            push_entry(&mut output, commit);
        }
        wrote_section = true;
    }

    if !wrote_section {
        match &notes.package {
            Some(name) => {
                let _ = write!(output, "\n**Note:** Version bump only for package {name}\n");
            }
            None => output.push_str("\n**Note:** Version bump only\n"),
        }
    }

    output
}

fn push_entry(output: &mut String, commit: &ConventionalCommit) {
    output.push_str("* ");
    if let Some(scope) = &commit.scope {
        let _ = write!(output, "**{scope}:** ");
    }
    let _ = writeln!(output, "{} ({})", commit.subject, commit.short_sha());
}
