use crate::{
    error::{MigrationError, MigrationResult},
    migrator::BoxedMigrator,
};

/// Asks whoever drives the migration whether to go ahead.
pub trait Confirmation {
    fn confirm(&mut self, html_info_text: &str) -> bool;
}

/// Always agrees, for unattended runs.
pub struct AssumeYes;
impl Confirmation for AssumeYes {
    fn confirm(&mut self, _html_info_text: &str) -> bool {
        true
    }
}

impl<F: FnMut(&str) -> bool> Confirmation for F {
    fn confirm(&mut self, html_info_text: &str) -> bool {
        self(html_info_text)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    /// Migrators whose cleanup failed. The migration itself still stands.
    pub tidy_up_failures: Vec<&'static str>,
}

#[derive(Debug)]
pub enum Outcome {
    NotRequired,
    Cancelled,
    Migrated(MigrationReport),
}

/// Runs an ordered set of migrators as one unit: all of them, or none.
#[derive(Default)]
pub struct MigrationController {
    migrators: Vec<BoxedMigrator>,
}

impl MigrationController {
    pub fn new(migrators: Vec<BoxedMigrator>) -> Self {
        Self { migrators }
    }

    pub fn with_migrator(mut self, migrator: BoxedMigrator) -> Self {
        self.migrators.push(migrator);
        self
    }

    pub fn is_migration_required(&self) -> bool {
        self.migrators.iter().any(|m| m.is_migration_required())
    }

    pub fn required(&self) -> Vec<&'static str> {
        self.migrators
            .iter()
            .filter(|m| m.is_migration_required())
            .map(|m| m.name())
            .collect()
    }

    /// Info texts of the migrators that still have work to do, as an HTML list.
    pub fn html_info_text(&self) -> String {
        let items: String = self
            .migrators
            .iter()
            .filter(|m| m.is_migration_required())
            .map(|m| format!("<li>{}</li>", m.html_info_text()))
            .collect();
        if items.is_empty() {
            return "<p>This project is up to date.</p>".to_owned();
        }
        format!("<p>This project needs to be migrated:</p><ul>{items}</ul>")
    }

    pub fn migrate(&mut self) -> MigrationResult<MigrationReport> {
        let mut report = MigrationReport::default();
        let mut applied: Vec<usize> = Vec::new();

        for index in 0..self.migrators.len() {
            let migrator = &mut self.migrators[index];
            // Asked only now: earlier steps may have changed the answer.
            if !migrator.is_migration_required() {
                report.skipped.push(migrator.name());
                continue;
            }

            tracing::info!("running migrator `{}`", migrator.name());
            if let Err(cause) = migrator.migrate() {
                tracing::error!("migrator `{}` failed: {cause}", migrator.name());
                applied.push(index);
                return Err(self.roll_back(applied, cause));
            }
            applied.push(index);
            report.applied.push(migrator.name());
        }

        for &index in &applied {
            let migrator = &mut self.migrators[index];
            let name = migrator.name();
            if let Some(tidy) = migrator.as_tidy_up() {
                if let Err(e) = tidy.tidy_up() {
                    tracing::warn!("tidy up of `{name}` failed: {e}");
                    report.tidy_up_failures.push(name);
                }
            }
        }

        Ok(report)
    }

    /// Undoes the given migrators newest first and folds any rollback failure into the error.
    fn roll_back(&mut self, applied: Vec<usize>, cause: MigrationError) -> MigrationError {
        let mut failures = Vec::new();
        for index in applied.into_iter().rev() {
            let migrator = &mut self.migrators[index];
            tracing::info!("rolling back `{}`", migrator.name());
            if let Err(e) = migrator.rollback() {
                tracing::error!("rollback of `{}` failed: {e}", migrator.name());
                failures.push(e);
            }
        }

        if failures.is_empty() {
            cause
        } else {
            MigrationError::RollbackIncomplete {
                cause: Box::new(cause),
                failures,
            }
        }
    }

    /// Checks, asks, then migrates.
    pub fn run(&mut self, confirmation: &mut impl Confirmation) -> MigrationResult<Outcome> {
        if !self.is_migration_required() {
            return Ok(Outcome::NotRequired);
        }
        if !confirmation.confirm(&self.html_info_text()) {
            tracing::info!("migration cancelled");
            return Ok(Outcome::Cancelled);
        }
        self.migrate().map(Outcome::Migrated)
    }
}
