use crate::{GitError, Result, TagInfo};

use super::Repository;

impl Repository {
    /// Creates an annotated tag on HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag cannot be created or already exists.
    pub fn create_tag(&self, name: &str, message: &str) -> Result<TagInfo> {
        let head = self.head_commit()?;
        let sig = self.inner.signature()?;

        self.inner
            .tag(name, head.as_object(), &sig, message, false)?;

        Ok(TagInfo {
            name: name.to_string(),
            target_sha: head.id().to_string(),
        })
    }

    /// # Errors
    ///
    /// Returns an error if the tag names cannot be read.
    pub fn has_tags(&self) -> Result<bool> {
        Ok(!self.inner.tag_names(None)?.is_empty())
    }

    /// The nearest tag reachable from HEAD whose name matches the glob `pattern`.
    ///
    /// # Errors
    ///
    /// Returns an error if describing HEAD fails for a reason other than
    /// there being no matching tag.
    pub fn last_tag(&self, pattern: &str) -> Result<Option<String>> {
        let mut opts = git2::DescribeOptions::new();
        opts.describe_tags().pattern(pattern);

        let describe = match self.inner.describe(&opts) {
            Ok(describe) => describe,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(GitError::Git(e)),
        };

        let mut format = git2::DescribeFormatOptions::new();
        format.abbreviated_size(0);
        Ok(Some(describe.format(Some(&format))?))
    }
}
