use semver::{Version, VersionReq};

const OPERATORS: [&str; 7] = [">=", "<=", ">", "<", "=", "^", "~"];

/// Operator used when a dependency range is rewritten to a new version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeStyle {
    #[default]
    Caret,
    Exact,
}

#[must_use]
pub fn format_range(version: &Version, style: RangeStyle) -> String {
    match style {
        RangeStyle::Caret => format!("^{version}"),
        RangeStyle::Exact => version.to_string(),
    }
}

/// Checks a version against an npm-style range.
///
/// Supports `||` alternatives, hyphen ranges, space-separated comparator sets
/// and the `workspace:` protocol prefix. A bare version means an exact match.
/// Anything that cannot be parsed does not match.
#[must_use]
pub fn satisfies(range: &str, version: &Version) -> bool {
    let range = range.trim();
    let range = range.strip_prefix("workspace:").unwrap_or(range).trim();

    range
        .split("||")
        .any(|alternative| match to_requirement(alternative.trim()) {
            Some(req) => req.matches(version),
            None => false,
        })
}

fn to_requirement(range: &str) -> Option<VersionReq> {
    if matches!(range, "" | "*" | "x" | "X" | "latest") {
        return Some(VersionReq::STAR);
    }

    let comparators = match range.split_once(" - ") {
        Some((low, high)) => vec![
            format!(">={}", strip_v(low.trim())),
            format!("<={}", strip_v(high.trim())),
        ],
        None => comparator_set(range),
    };

    VersionReq::parse(&comparators.join(", ")).ok()
}

fn comparator_set(range: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending_operator: Option<&str> = None;

    for token in range.split_whitespace() {
        if OPERATORS.contains(&token) {
            pending_operator = Some(token);
            continue;
        }
        let token = match pending_operator.take() {
            Some(op) => format!("{op}{token}"),
            None => token.to_string(),
        };
        out.push(normalize_comparator(&token));
    }

    out
}

fn normalize_comparator(token: &str) -> String {
    let split = token
        .find(|c: char| c.is_ascii_digit() || matches!(c, 'x' | 'X' | '*' | 'v'))
        .unwrap_or(token.len());
    let (operator, version) = token.split_at(split);
    let version = strip_v(version);

    if operator.is_empty() {
        if version.contains(['x', 'X', '*']) {
            version.to_string()
        } else {
            format!("={version}")
        }
    } else {
        format!("{operator}{version}")
    }
}

fn strip_v(version: &str) -> &str {
    version.strip_prefix('v').unwrap_or(version)
}
