use std::path::{Path, PathBuf};

use semver::Version;
use serde_json::{Map, Value};

use crate::error::ManifestError;
use crate::format::JsonFormat;
use crate::Result;

/// The workspace-root `monopub.json`, edited in place so configuration keys
/// the recorder does not own are preserved.
#[derive(Debug, Clone)]
pub struct RootRecord {
    path: PathBuf,
    document: Map<String, Value>,
    format: JsonFormat,
}

impl RootRecord {
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Object(document) = value else {
            return Err(ManifestError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        Ok(Self {
            path: path.to_path_buf(),
            document,
            format: JsonFormat::detect(&content),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw `version` value: a semver string, `"independent"`, or absent.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.document.get("version").and_then(Value::as_str)
    }

    pub fn set_version(&mut self, version: &Version) {
        self.document
            .insert("version".to_string(), Value::String(version.to_string()));
    }

    /// # Errors
    ///
    /// Returns `ManifestError::Write` if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let content = self
            .format
            .render(&self.document)
            .map_err(|source| ManifestError::Serialize {
                path: self.path.clone(),
                source,
            })?;

        std::fs::write(&self.path, content).map_err(|source| ManifestError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
