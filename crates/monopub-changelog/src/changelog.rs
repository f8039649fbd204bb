use std::path::Path;

use crate::error::ChangelogError;
use crate::format::new_changelog;

const RELEASE_HEADING: &str = "\n## ";

#[derive(Debug, Clone)]
pub struct Changelog {
    content: String,
}

impl Default for Changelog {
    fn default() -> Self {
        Self::new()
    }
}

impl Changelog {
    #[must_use]
    pub fn new() -> Self {
        Self {
            content: new_changelog(),
        }
    }

    /// Reads `path`, or starts a fresh changelog when it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `ChangelogError::Read` if an existing file cannot be read.
    pub fn load_or_new(path: &Path) -> Result<Self, ChangelogError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self { content }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(ChangelogError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Inserts a rendered release above the newest existing one.
    pub fn add_release(&mut self, release: &str) {
        let insertion_point = self.find_insertion_point();
        let (head, rest) = self.content.split_at(insertion_point);

        let mut new_content = String::with_capacity(self.content.len() + release.len() + 4);
        new_content.push_str(head);
        if !new_content.is_empty() && !new_content.ends_with("\n\n") {
            new_content.push_str(if new_content.ends_with('\n') { "\n" } else { "\n\n" });
        }
        new_content.push_str(release);
        if !rest.is_empty() {
            if !release.ends_with("\n\n") {
                new_content.push('\n');
            }
            new_content.push_str(rest);
        }

        self.content = new_content;
    }

    /// # Errors
    ///
    /// Returns `ChangelogError::Write` if the file cannot be written.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ChangelogError> {
        std::fs::write(path, &self.content).map_err(|source| ChangelogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn find_insertion_point(&self) -> usize {
        self.content
            .find(RELEASE_HEADING)
            .map_or(self.content.len(), |pos| pos + 1)
    }
}
