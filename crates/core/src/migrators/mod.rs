pub mod packages;
pub mod rename;
pub mod settings;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use packages::PackageMigrator;
pub use rename::ExtensionRenameMigrator;
pub use settings::SettingsMigrator;

use crate::{migrator::BoxedMigrator, project::Project};

/// Names accepted by [`MigratorSelection::only`], in run order.
pub const MIGRATOR_NAMES: [&str; 4] = ["rename-documents", "rename-project", "settings", "packages"];

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default, rename_all = "kebab-case")]
pub struct MigratorSelection {
    pub rename_documents: bool,
    pub rename_project: bool,
    pub settings: bool,
    pub packages: bool,
}

impl Default for MigratorSelection {
    fn default() -> Self {
        Self {
            rename_documents: true,
            rename_project: true,
            settings: true,
            packages: true,
        }
    }
}

impl MigratorSelection {
    pub fn none() -> Self {
        Self {
            rename_documents: false,
            rename_project: false,
            settings: false,
            packages: false,
        }
    }

    /// Narrows this selection to the named migrators. Unknown names are returned as the error.
    pub fn only<S: AsRef<str>>(self, names: &[S]) -> Result<Self, String> {
        let mut picked = Self::none();
        for name in names {
            match name.as_ref() {
                "rename-documents" => picked.rename_documents = self.rename_documents,
                "rename-project" => picked.rename_project = self.rename_project,
                "settings" => picked.settings = self.settings,
                "packages" => picked.packages = self.packages,
                other => return Err(other.to_owned()),
            }
        }
        Ok(picked)
    }
}

/// Every enabled migrator for the project at `root`, in the order they must run.
pub fn project_migrators(root: &Path, selection: &MigratorSelection) -> Vec<BoxedMigrator> {
    let mut migrators: Vec<BoxedMigrator> = Vec::new();
    if selection.rename_documents {
        migrators.push(Box::new(ExtensionRenameMigrator::documents(root)));
    }
    // Runs before the settings steps so they find the renamed project file.
    if selection.rename_project {
        migrators.push(Box::new(ExtensionRenameMigrator::project_file(root)));
    }
    if selection.settings {
        migrators.push(Box::new(SettingsMigrator::new(Project::open(root))));
    }
    if selection.packages {
        migrators.push(Box::new(PackageMigrator::new(Project::open(root))));
    }
    migrators
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_migrators_in_order() {
        let names: Vec<_> = project_migrators(Path::new("."), &MigratorSelection::default())
            .iter()
            .map(|m| m.name())
            .collect();
        assert_eq!(names, MIGRATOR_NAMES);
    }

    #[test]
    fn test_only_respects_disabled_migrators() {
        let config = MigratorSelection {
            packages: false,
            ..Default::default()
        };
        let picked = config.only(&["settings", "packages"]).unwrap();
        assert_eq!(
            picked,
            MigratorSelection {
                settings: true,
                ..MigratorSelection::none()
            }
        );
        assert_eq!(config.only(&["bogus"]), Err("bogus".to_owned()));
    }
}
