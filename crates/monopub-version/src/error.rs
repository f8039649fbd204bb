use thiserror::Error;

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("invalid prerelease identifier '{identifier}'")]
    InvalidPrerelease {
        identifier: String,
        #[source]
        source: semver::Error,
    },

    #[error("prerelease counter overflow in '{0}'")]
    CounterOverflow(String),
}
