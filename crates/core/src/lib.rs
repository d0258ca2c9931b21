pub mod checksum;
pub mod command;
pub mod consts;
pub mod controller;
pub mod error;
pub mod migrator;
pub mod migrators;
pub mod project;

pub use controller::{AssumeYes, Confirmation, MigrationController, MigrationReport, Outcome};
pub use error::{MigrationError, MigrationResult};
pub use migrator::{BoxedMigrator, Migrator, TidyUp};
pub use migrators::{MigratorSelection, project_migrators};

/// A controller holding every selected migrator for the project at `root`.
pub fn project_controller(
    root: &std::path::Path,
    selection: &MigratorSelection,
) -> MigrationController {
    MigrationController::new(project_migrators(root, selection))
}
