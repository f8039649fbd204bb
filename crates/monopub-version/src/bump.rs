use monopub_core::BumpKeyword;
use semver::{BuildMetadata, Prerelease, Version};

use crate::Result;
use crate::error::VersionError;

const SHORT_SHA_LEN: usize = 7;

/// Applies an increment keyword the way npm's semver `inc` does.
///
/// A prerelease of the targeted release line is promoted instead of bumped
/// again: `2.0.0-beta.1` with `major` becomes `2.0.0`.
///
/// # Errors
///
/// Returns `VersionError` if `preid` is not a valid prerelease identifier.
pub fn increment(version: &Version, keyword: BumpKeyword, preid: &str) -> Result<Version> {
    let mut next = version.clone();
    next.build = BuildMetadata::EMPTY;
    let had_pre = !version.pre.is_empty();

    match keyword {
        BumpKeyword::Major => {
            if version.minor != 0 || version.patch != 0 || !had_pre {
                next.major += 1;
            }
            next.minor = 0;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        BumpKeyword::Minor => {
            if version.patch != 0 || !had_pre {
                next.minor += 1;
            }
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        BumpKeyword::Patch => {
            if !had_pre {
                next.patch += 1;
            }
            next.pre = Prerelease::EMPTY;
        }
        BumpKeyword::Premajor => {
            next.major += 1;
            next.minor = 0;
            next.patch = 0;
            next.pre = first_prerelease(preid)?;
        }
        BumpKeyword::Preminor => {
            next.minor += 1;
            next.patch = 0;
            next.pre = first_prerelease(preid)?;
        }
        BumpKeyword::Prepatch => {
            next.patch += 1;
            next.pre = first_prerelease(preid)?;
        }
        BumpKeyword::Prerelease => {
            if had_pre {
                next.pre = next_prerelease(&version.pre, preid)?;
            } else {
                next.patch += 1;
                next.pre = first_prerelease(preid)?;
            }
        }
    }

    Ok(next)
}

/// Builds the ephemeral `<base>-<suffix>.<sha>` version used by canary releases.
///
/// `sha` is the full commit hash. It is abbreviated to seven characters, or
/// more when a shorter prefix would be an all-digit identifier with a leading
/// zero.
///
/// # Errors
///
/// Returns `VersionError` if the suffix or hash is not a valid prerelease identifier.
pub fn canary_version(
    current: &Version,
    keyword: BumpKeyword,
    suffix: &str,
    sha: &str,
) -> Result<Version> {
    let mut base = increment(current, keyword, suffix)?;
    base.pre = parse_prerelease(&format!("{suffix}.{}", abbreviate_sha(sha)))?;
    Ok(base)
}

fn abbreviate_sha(sha: &str) -> &str {
    if !sha.is_ascii() {
        return sha;
    }
    let mut len = SHORT_SHA_LEN.min(sha.len());
    while len < sha.len() && is_zero_padded_number(&sha[..len]) {
        len += 1;
    }
    &sha[..len]
}

fn is_zero_padded_number(id: &str) -> bool {
    id.len() > 1 && id.starts_with('0') && id.bytes().all(|b| b.is_ascii_digit())
}

#[must_use]
pub fn is_prerelease(version: &Version) -> bool {
    !version.pre.is_empty()
}

/// The first alphanumeric prerelease identifier, e.g. `beta` for `1.0.0-beta.2`.
#[must_use]
pub fn prerelease_tag(version: &Version) -> Option<String> {
    version
        .pre
        .as_str()
        .split('.')
        .find(|id| !id.is_empty() && id.parse::<u64>().is_err())
        .map(String::from)
}

fn first_prerelease(preid: &str) -> Result<Prerelease> {
    parse_prerelease(&format!("{preid}.0"))
}

/// Switching to `preid` restarts its counter, unless that would sort below
/// `pre`; then the current identifier keeps counting.
fn next_prerelease(pre: &Prerelease, preid: &str) -> Result<Prerelease> {
    if pre.as_str().split('.').next() != Some(preid) {
        let switched = first_prerelease(preid)?;
        if switched > *pre {
            return Ok(switched);
        }
    }

    let mut ids: Vec<String> = pre.as_str().split('.').map(String::from).collect();
    match ids.iter().rposition(|id| id.parse::<u64>().is_ok()) {
        Some(idx) => {
            let counter: u64 = ids[idx]
                .parse()
                .map_err(|_| VersionError::CounterOverflow(pre.to_string()))?;
            let bumped = counter
                .checked_add(1)
                .ok_or_else(|| VersionError::CounterOverflow(pre.to_string()))?;
            ids[idx] = bumped.to_string();
        }
        None => ids.push("0".to_string()),
    }

    parse_prerelease(&ids.join("."))
}

fn parse_prerelease(identifier: &str) -> Result<Prerelease> {
    Prerelease::new(identifier).map_err(|source| VersionError::InvalidPrerelease {
        identifier: identifier.to_string(),
        source,
    })
}
