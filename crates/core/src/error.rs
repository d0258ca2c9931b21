use std::{io, path::PathBuf};

use thiserror::Error;

/// Why a migration (or undoing one) could not complete.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("{migrator}: {cause}")]
    Failed { migrator: String, cause: String },

    #[error("i/o error at `{}`: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("project settings `{}` unusable: {cause}", .path.display())]
    Settings { path: PathBuf, cause: String },

    #[error("`{}` already exists", .path.display())]
    TargetExists { path: PathBuf },

    #[error("backup of `{}` does not match the original contents", .path.display())]
    ChecksumMismatch { path: PathBuf },

    #[error("{cause}; rollback left {} step(s) undone", .failures.len())]
    RollbackIncomplete {
        cause: Box<MigrationError>,
        failures: Vec<MigrationError>,
    },
}

impl MigrationError {
    pub fn failed(migrator: impl Into<String>, cause: impl ToString) -> Self {
        MigrationError::Failed {
            migrator: migrator.into(),
            cause: cause.to_string(),
        }
    }

    pub fn settings(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        MigrationError::Settings {
            path: path.into(),
            cause: cause.to_string(),
        }
    }
}

pub type MigrationResult<T> = Result<T, MigrationError>;

/// Attaches the offending path to a raw `io::Error`.
pub trait IoContext<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> MigrationResult<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at_path(self, path: impl Into<PathBuf>) -> MigrationResult<T> {
        self.map_err(|source| MigrationError::Io {
            path: path.into(),
            source,
        })
    }
}
