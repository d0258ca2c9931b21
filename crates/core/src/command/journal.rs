use super::FileCommand;
use crate::error::{MigrationError, MigrationResult};

/// Executed commands in the order they ran.
#[derive(Default)]
pub struct CommandJournal {
    done: Vec<Box<dyn FileCommand>>,
}

impl CommandJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes `command` and records it. A command that fails is not recorded.
    pub fn run(&mut self, mut command: impl FileCommand + 'static) -> MigrationResult<()> {
        command.execute()?;
        tracing::trace!("{}", command.describe());
        self.done.push(Box::new(command));
        Ok(())
    }

    /// Undoes everything, newest first. Keeps going past failures and reports the first.
    pub fn undo_all(&mut self) -> MigrationResult<()> {
        let mut first: Option<MigrationError> = None;
        while let Some(mut command) = self.done.pop() {
            if let Err(e) = command.undo() {
                tracing::error!("undo `{}` failed: {e}", command.describe());
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    pub fn tidy_up_all(&mut self) -> MigrationResult<()> {
        let mut first: Option<MigrationError> = None;
        for mut command in self.done.drain(..) {
            if let Err(e) = command.tidy_up() {
                tracing::warn!("tidy up `{}` failed: {e}", command.describe());
                first.get_or_insert(e);
            }
        }
        first.map_or(Ok(()), Err)
    }

    pub fn is_empty(&self) -> bool {
        self.done.is_empty()
    }

    pub fn len(&self) -> usize {
        self.done.len()
    }
}
