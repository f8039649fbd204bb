use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use monopub_core::{DependencyKind, PackageInfo};
use semver::Version;
use serde_json::{Map, Value};

use crate::error::ManifestError;
use crate::format::JsonFormat;
use crate::Result;

/// An in-memory `package.json` that tracks whether it has been edited.
///
/// Unknown keys and key order survive a load/save cycle untouched.
#[derive(Debug, Clone)]
pub struct PackageManifest {
    path: PathBuf,
    document: Map<String, Value>,
    format: JsonFormat,
    dirty: bool,
}

impl PackageManifest {
    /// # Errors
    ///
    /// Returns `ManifestError::Read` if the file cannot be read, or
    /// `ManifestError::Parse` if it is not a JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// # Errors
    ///
    /// Returns `ManifestError::Parse` or `ManifestError::NotAnObject` for malformed input.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
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
            format: JsonFormat::detect(content),
            dirty: false,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// # Errors
    ///
    /// Returns `ManifestError::MissingField` if `name` is absent or not a string.
    pub fn name(&self) -> Result<&str> {
        self.document
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing("name"))
    }

    /// # Errors
    ///
    /// Returns `ManifestError::MissingField` or `ManifestError::InvalidVersion`.
    pub fn version(&self) -> Result<Version> {
        let raw = self
            .document
            .get("version")
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing("version"))?;

        Version::parse(raw).map_err(|source| ManifestError::InvalidVersion {
            path: self.path.clone(),
            version: raw.to_string(),
            source,
        })
    }

    pub fn set_version(&mut self, version: &Version) {
        let rendered = Value::String(version.to_string());
        if self.document.get("version") != Some(&rendered) {
            self.document.insert("version".to_string(), rendered);
            self.dirty = true;
        }
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        self.document
            .get("private")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn ranges(&self, kind: DependencyKind) -> IndexMap<String, String> {
        self.document
            .get(kind.manifest_key())
            .and_then(Value::as_object)
            .map(|deps| {
                deps.iter()
                    .filter_map(|(name, range)| Some((name.clone(), range.as_str()?.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[must_use]
    pub fn range(&self, kind: DependencyKind, dependency: &str) -> Option<&str> {
        self.document
            .get(kind.manifest_key())?
            .as_object()?
            .get(dependency)?
            .as_str()
    }

    /// Replaces an existing range. Returns `false` when the entry is absent,
    /// in which case nothing changes.
    pub fn set_range(&mut self, kind: DependencyKind, dependency: &str, range: &str) -> bool {
        let Some(entry) = self
            .document
            .get_mut(kind.manifest_key())
            .and_then(Value::as_object_mut)
            .and_then(|deps| deps.get_mut(dependency))
        else {
            return false;
        };

        if entry.as_str() != Some(range) {
            *entry = Value::String(range.to_string());
            self.dirty = true;
        }
        true
    }

    #[must_use]
    pub fn scripts(&self) -> BTreeSet<String> {
        self.document
            .get("scripts")
            .and_then(Value::as_object)
            .map(|scripts| scripts.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot used to build the package graph.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` or `version` is missing or malformed.
    pub fn to_package_info(&self) -> Result<PackageInfo> {
        let mut info = PackageInfo::new(self.name()?, self.version()?, self.directory());
        info.manifest_path.clone_from(&self.path);
        info.private = self.is_private();
        info.dependencies = self.ranges(DependencyKind::Normal);
        info.dev_dependencies = self.ranges(DependencyKind::Dev);
        info.peer_dependencies = self.ranges(DependencyKind::Peer);
        info.lifecycle_scripts = self.scripts();
        Ok(info)
    }

    /// # Errors
    ///
    /// Returns `ManifestError::Serialize` if rendering fails.
    pub fn render(&self) -> Result<String> {
        self.format
            .render(&self.document)
            .map_err(|source| ManifestError::Serialize {
                path: self.path.clone(),
                source,
            })
    }

    /// Writes the manifest back to its path and clears the dirty flag.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::Write` if the file cannot be written.
    pub fn save(&mut self) -> Result<()> {
        let content = self.render()?;
        std::fs::write(&self.path, content).map_err(|source| ManifestError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.dirty = false;
        Ok(())
    }

    fn missing(&self, field: &str) -> ManifestError {
        ManifestError::MissingField {
            path: self.path.clone(),
            field: field.to_string(),
        }
    }
}
