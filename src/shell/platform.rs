//! Platform and environment detection.

/// Variables set by common CI providers.
const CI_VARIABLES: &[&str] = &[
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
];

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    detect_ci(|name| std::env::var_os(name).is_some())
}

fn detect_ci(is_set: impl Fn(&str) -> bool) -> bool {
    CI_VARIABLES.iter().any(|name| is_set(name))
}
