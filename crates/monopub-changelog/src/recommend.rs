use monopub_core::BumpKeyword;
use semver::Version;

use crate::commit::ConventionalCommit;
use crate::preset::ChangelogPreset;

/// Bump implied by a set of commits: breaking changes are major, features
/// minor, anything else patch.
///
/// Before 1.0.0 a breaking change only bumps minor, since the public API is
/// not yet considered stable.
#[must_use]
pub fn recommend_bump(
    commits: &[ConventionalCommit],
    current: &Version,
    preset: ChangelogPreset,
) -> BumpKeyword {
    let breaking = commits.iter().any(|c| c.breaking);
    let feature = commits.iter().any(|c| preset.is_feature(&c.kind));

    let bump = if breaking {
        BumpKeyword::Major
    } else if feature {
        BumpKeyword::Minor
    } else {
        BumpKeyword::Patch
    };

    if bump == BumpKeyword::Major && current.major == 0 {
        BumpKeyword::Minor
    } else {
        bump
    }
}
