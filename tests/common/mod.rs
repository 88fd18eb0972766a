#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

pub const MESSAGES_CSV: &str = "\
id,message,original,genre
2,Weather update - a cold front from Cuba,Un front froid se retrouve sur Cuba,direct
7,Is the Hurricane over or is it not over,Cyclone nan fini osinon li pa fini,direct
8,Looking for someone but no name,Patnm kap fe from ak ki bon,direct
";

pub const CATEGORIES_CSV: &str = "\
id,categories
2,related-1;request-0;offer-0
7,related-1;request-0;offer-0
8,related-1;request-1;offer-0
8,related-1;request-1;offer-0
";

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }

    /// Writes the sample messages and categories datasets.
    pub fn write_samples(&self) -> (PathBuf, PathBuf) {
        (
            self.write("messages.csv", MESSAGES_CSV),
            self.write("categories.csv", CATEGORIES_CSV),
        )
    }
}
