pub mod layout;
pub mod settings;

use std::path::{Path, PathBuf};

use layout::{Layout, Layoutable, ProjectLayout, Resource};
use sbmigrate_shared::{persistor::json_persistor, version::Persistor};
use settings::ProjectSettings;

use crate::error::{MigrationError, MigrationResult};

/// A project directory on disk together with the layout used to find things in it.
#[derive(Debug, Clone)]
pub struct Project<L: Layout = ProjectLayout> {
    pub root: PathBuf,
    pub layout: L,
}

impl Project<ProjectLayout> {
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(root.into(), ProjectLayout)
    }
}

impl<L: Layout> Project<L> {
    pub fn new(root: PathBuf, layout: L) -> Self {
        Self { root, layout }
    }

    pub fn settings_path(&self) -> Option<PathBuf> {
        self.get_existing_resource(Resource::ProjectFile)
    }

    /// Reads the settings document. A missing project file is an error.
    pub fn load_settings(&self) -> MigrationResult<(PathBuf, ProjectSettings)> {
        let path = self.settings_path().ok_or_else(|| {
            MigrationError::settings(&self.root, "no project file in project directory")
        })?;
        let settings = json_persistor::<ProjectSettings>(&path)
            .load()
            .map_err(|e| MigrationError::settings(&path, format!("{e:#}")))?
            .ok_or_else(|| MigrationError::settings(&path, "project file vanished"))?;
        Ok((path, settings))
    }

    pub fn save_settings(&self, path: &Path, settings: &ProjectSettings) -> MigrationResult<()> {
        json_persistor::<ProjectSettings>(path)
            .save(settings)
            .map_err(|e| MigrationError::settings(path, format!("{e:#}")))
    }
}

impl<L: Layout> Layoutable<L> for Project<L> {
    fn layout(&self) -> &L {
        &self.layout
    }

    fn root_path(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_settings_without_project_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Project::open(dir.path()).load_settings().unwrap_err();
        assert!(matches!(err, MigrationError::Settings { .. }));
    }

    #[test]
    fn test_save_then_load_keeps_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Game.sbproj");
        fs::write(&path, r#"{ "version": 2, "publishDirectory": "out" }"#).unwrap();

        let project = Project::open(dir.path());
        let (found, settings) = project.load_settings().unwrap();
        assert_eq!(found, path);
        project.save_settings(&found, &settings).unwrap();

        let (_, reloaded) = project.load_settings().unwrap();
        assert_eq!(reloaded.extra["publishDirectory"], "out");
    }
}
