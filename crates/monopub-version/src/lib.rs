mod bump;
mod error;
mod range;

pub use bump::{canary_version, increment, is_prerelease, prerelease_tag};
pub use error::VersionError;
pub use range::{RangeStyle, format_range, satisfies};

pub type Result<T> = std::result::Result<T, VersionError>;
