use std::{fs, path::PathBuf};

use super::FileCommand;
use crate::error::{IoContext, MigrationResult};

/// Creates a directory and its missing parents; undo removes only what it created.
#[derive(Debug, Clone)]
pub struct CreateDirectory {
    path: PathBuf,
    created: Vec<PathBuf>,
}

impl CreateDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            created: Vec::new(),
        }
    }
}

impl FileCommand for CreateDirectory {
    fn execute(&mut self) -> MigrationResult<()> {
        let mut missing = Vec::new();
        let mut cursor = Some(self.path.as_path());
        while let Some(dir) = cursor {
            if dir.as_os_str().is_empty() || dir.exists() {
                break;
            }
            missing.push(dir.to_path_buf());
            cursor = dir.parent();
        }

        fs::create_dir_all(&self.path).at_path(&self.path)?;
        // Deepest first, which is also the order undo needs.
        self.created = missing;
        Ok(())
    }

    fn undo(&mut self) -> MigrationResult<()> {
        for dir in self.created.drain(..) {
            match fs::remove_dir(&dir) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).at_path(dir),
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("create directory {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_removes_only_created_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("packages");
        fs::create_dir(&existing).unwrap();
        let target = existing.join("Art.sbpack").join("images");

        let mut cmd = CreateDirectory::new(&target);
        cmd.execute().unwrap();
        assert!(target.is_dir());

        cmd.undo().unwrap();
        assert!(!existing.join("Art.sbpack").exists());
        assert!(existing.is_dir());
    }

    #[test]
    fn test_existing_directory_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let mut cmd = CreateDirectory::new(dir.path());
        cmd.execute().unwrap();
        cmd.undo().unwrap();
        assert!(dir.path().is_dir());
    }
}
