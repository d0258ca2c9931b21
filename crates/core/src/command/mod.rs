mod backup;
mod directory;
mod journal;
mod moving;

pub use backup::BackupFile;
pub use directory::CreateDirectory;
pub use journal::CommandJournal;
pub use moving::MoveFile;

use crate::error::MigrationResult;

/// A file-system change that knows how to take itself back.
pub trait FileCommand: Send {
    fn execute(&mut self) -> MigrationResult<()>;
    fn undo(&mut self) -> MigrationResult<()>;
    /// Drops whatever the command kept around to be able to undo.
    fn tidy_up(&mut self) -> MigrationResult<()> {
        Ok(())
    }
    fn describe(&self) -> String;
}
