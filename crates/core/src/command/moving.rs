use std::{fs::rename, path::PathBuf};

use super::FileCommand;
use crate::error::{IoContext, MigrationError, MigrationResult};

#[derive(Debug, Clone)]
pub struct MoveFile {
    from: PathBuf,
    to: PathBuf,
    executed: bool,
}

impl MoveFile {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            executed: false,
        }
    }
}

impl FileCommand for MoveFile {
    fn execute(&mut self) -> MigrationResult<()> {
        if self.to.exists() {
            return Err(MigrationError::TargetExists {
                path: self.to.clone(),
            });
        }
        rename(&self.from, &self.to).at_path(&self.from)?;
        self.executed = true;
        Ok(())
    }

    fn undo(&mut self) -> MigrationResult<()> {
        if !self.executed {
            return Ok(());
        }
        if self.from.exists() {
            return Err(MigrationError::TargetExists {
                path: self.from.clone(),
            });
        }
        rename(&self.to, &self.from).at_path(&self.to)?;
        self.executed = false;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("move {} -> {}", self.from.display(), self.to.display())
    }
}
