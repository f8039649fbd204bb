#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub remote: TempDir,
}

impl TestRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, path: &str) -> String {
        fs::read_to_string(self.path().join(path)).expect("read file")
    }

    pub fn write(&self, path: &str, content: &str) {
        let full = self.path().join(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent).expect("create parent dir");
        }
        fs::write(full, content).expect("write file");
    }

    pub fn commit_all(&self, message: &str) {
        git(self.path(), &["add", "-A"]);
        git(self.path(), &["commit", "-m", message]);
    }

    pub fn tags(&self) -> Vec<String> {
        let output = Command::new("git")
            .args(["tag", "--list"])
            .current_dir(self.path())
            .output()
            .expect("failed to list tags");
        String::from_utf8(output.stdout)
            .expect("utf8 tag list")
            .lines()
            .map(String::from)
            .collect()
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(status.status.success(), "git {args:?} failed");
}

/// Fixed-mode workspace with `a` and `b` (which depends on `a`), committed on
/// `main` with a bare `origin` remote.
pub fn setup_workspace() -> TestRepo {
    let repo = TestRepo {
        dir: TempDir::new().expect("create temp dir"),
        remote: TempDir::new().expect("create remote dir"),
    };

    git(repo.remote.path(), &["init", "--bare"]);
    git(repo.path(), &["init", "--initial-branch=main"]);
    git(repo.path(), &["config", "user.email", "test@example.com"]);
    git(repo.path(), &["config", "user.name", "Test"]);
    git(
        repo.path(),
        &[
            "remote",
            "add",
            "origin",
            &repo.remote.path().to_string_lossy(),
        ],
    );

    repo.write(
        "monopub.json",
        r#"{
  "version": "1.0.0",
  "packages": ["packages/*"]
}
"#,
    );
    repo.write(
        "packages/a/package.json",
        r#"{
  "name": "a",
  "version": "1.0.0"
}
"#,
    );
    repo.write(
        "packages/b/package.json",
        r#"{
  "name": "b",
  "version": "1.0.0",
  "dependencies": {
    "a": "^1.0.0"
  }
}
"#,
    );
    repo.commit_all("initial commit");
    repo
}
