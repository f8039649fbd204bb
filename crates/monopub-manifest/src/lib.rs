mod error;
mod format;
mod package;
mod root;

pub use error::ManifestError;
pub use format::JsonFormat;
pub use package::PackageManifest;
pub use root::RootRecord;

pub type Result<T> = std::result::Result<T, ManifestError>;
