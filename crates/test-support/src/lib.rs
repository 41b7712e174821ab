use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A SQLite database file inside a temp directory that is removed on drop.
pub struct TempDatabase {
    dir: TempDir,
    path: PathBuf,
}

impl TempDatabase {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("taskboard-test-").tempdir()?;
        let path = dir.path().join("db.sqlite");
        Ok(Self { dir, path })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Connection URL that creates the file on first connect.
    pub fn url(&self) -> String {
        format!("sqlite://{}?mode=rwc", self.path.to_string_lossy())
    }
}
