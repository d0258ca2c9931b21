use std::{
    fs,
    path::{Path, PathBuf},
};

use uuid::Uuid;

use super::FileCommand;
use crate::{
    checksum::{file_sha1, validate_file_sha1},
    consts::BACKUP_EXTENSION,
    error::{IoContext, MigrationError, MigrationResult},
};

/// Copies a file aside before it gets rewritten. Undo puts the copy back,
/// tidy-up deletes it.
#[derive(Debug, Clone)]
pub struct BackupFile {
    path: PathBuf,
    backup: Option<PathBuf>,
    checksum: String,
}

impl BackupFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: None,
            checksum: String::new(),
        }
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    fn next_backup_path(&self) -> MigrationResult<PathBuf> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| MigrationError::failed("Backup", "path has no file name"))?;
        let file_name = format!(
            ".{}.{}.{BACKUP_EXTENSION}",
            name.to_string_lossy(),
            Uuid::new_v4().simple()
        );
        Ok(self.path.with_file_name(file_name))
    }
}

impl FileCommand for BackupFile {
    fn execute(&mut self) -> MigrationResult<()> {
        let backup = self.next_backup_path()?;
        self.checksum = file_sha1(&self.path)?;
        fs::copy(&self.path, &backup).at_path(&self.path)?;
        tracing::debug!("backed up {} to {}", self.path.display(), backup.display());
        self.backup = Some(backup);
        Ok(())
    }

    fn undo(&mut self) -> MigrationResult<()> {
        let Some(backup) = self.backup.take() else {
            return Ok(());
        };
        if !validate_file_sha1(&backup, &self.checksum)? {
            // Keep the backup around; it is the only copy we have.
            self.backup = Some(backup.clone());
            return Err(MigrationError::ChecksumMismatch { path: backup });
        }
        fs::copy(&backup, &self.path).at_path(&backup)?;
        fs::remove_file(&backup).at_path(&backup)?;
        Ok(())
    }

    fn tidy_up(&mut self) -> MigrationResult<()> {
        if let Some(backup) = self.backup.take() {
            fs::remove_file(&backup).at_path(&backup)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("back up {}", self.path.display())
    }
}
