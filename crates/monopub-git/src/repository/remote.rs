use std::cell::RefCell;
use std::path::Path;

use crate::{GitError, Result};

use super::Repository;

const SSH_KEYS: [&str; 3] = ["id_ed25519", "id_rsa", "id_ecdsa"];

impl Repository {
    /// Pushes `branch` and every tag in `tags` to `remote` in one round trip.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::RemoteNotFound`] when the remote is not configured and
    /// [`GitError::PushRejected`] when the remote refuses any reference.
    pub fn push_with_tags(&self, remote: &str, branch: &str, tags: &[String]) -> Result<()> {
        let mut handle = self
            .inner
            .find_remote(remote)
            .map_err(|_| GitError::RemoteNotFound {
                name: remote.to_string(),
            })?;

        let mut refspecs = vec![format!("refs/heads/{branch}:refs/heads/{branch}")];
        refspecs.extend(tags.iter().map(|tag| format!("refs/tags/{tag}:refs/tags/{tag}")));

        let rejected: RefCell<Option<(String, String)>> = RefCell::new(None);

        let mut callbacks = git2::RemoteCallbacks::new();
        callbacks.credentials(|_url, username_from_url, allowed_types| {
            credentials(username_from_url, allowed_types)
        });
        callbacks.push_update_reference(|refname, status| {
            if let Some(message) = status {
                rejected
                    .borrow_mut()
                    .get_or_insert_with(|| (refname.to_string(), message.to_string()));
            }
            Ok(())
        });

        let mut push_options = git2::PushOptions::new();
        push_options.remote_callbacks(callbacks);
        handle.push(&refspecs, Some(&mut push_options))?;
        drop(push_options);

        match rejected.into_inner() {
            Some((refname, message)) => Err(GitError::PushRejected { refname, message }),
            None => Ok(()),
        }
    }
}

fn credentials(
    username_from_url: Option<&str>,
    allowed_types: git2::CredentialType,
) -> std::result::Result<git2::Cred, git2::Error> {
    let username = username_from_url.unwrap_or("git");

    if allowed_types.contains(git2::CredentialType::SSH_KEY) {
        if let Ok(cred) = git2::Cred::ssh_key_from_agent(username) {
            return Ok(cred);
        }
        if let Some(home) = std::env::var_os("HOME") {
            let ssh_dir = Path::new(&home).join(".ssh");
            for key in SSH_KEYS {
                let path = ssh_dir.join(key);
                if path.exists() {
                    if let Ok(cred) = git2::Cred::ssh_key(username, None, &path, None) {
                        return Ok(cred);
                    }
                }
            }
        }
    }

    git2::Cred::default()
}
