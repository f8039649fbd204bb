use std::io::IsTerminal;

const NO_TTY_VAR: &str = "MONOPUB_NO_TTY";
const FORCE_TTY_VAR: &str = "MONOPUB_FORCE_TTY";
const NPM_CLIENT_VAR: &str = "MONOPUB_NPM_CLIENT";

const CI_ENV_VARS: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TF_BUILD",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonInteractiveReason {
    ExplicitDisable,
    CiDetected { env_var: String },
    NoTerminal,
}

pub fn non_interactive_reason() -> Option<NonInteractiveReason> {
    if std::env::var(NO_TTY_VAR).is_ok() {
        return Some(NonInteractiveReason::ExplicitDisable);
    }

    if std::env::var(FORCE_TTY_VAR).is_ok() {
        return None;
    }

    if let Some(env_var) = detect_ci_env_var() {
        return Some(NonInteractiveReason::CiDetected { env_var });
    }

    if !std::io::stdin().is_terminal() {
        return Some(NonInteractiveReason::NoTerminal);
    }

    None
}

/// Alternative npm-compatible client binary, e.g. `pnpm`.
pub fn npm_client() -> Option<String> {
    std::env::var(NPM_CLIENT_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn detect_ci_env_var() -> Option<String> {
    CI_ENV_VARS
        .iter()
        .find(|var| std::env::var(var).is_ok())
        .map(|var| (*var).to_string())
}
