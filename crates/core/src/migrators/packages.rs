use std::path::{Component, Path, PathBuf};

use crate::{
    command::{BackupFile, CommandJournal, CreateDirectory, MoveFile},
    consts::{PACKAGE_EXTENSION, PACKAGES_DIR_NAME},
    error::{MigrationError, MigrationResult},
    migrator::{Migrator, TidyUp, escape_html},
    project::{
        Project,
        layout::{Layoutable, Resource},
        settings::{ProjectSettings, ResourcePath},
    },
};

/// What has to happen to one `resourcePaths` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingPackage {
    /// A loose folder that moves to `packages/<name>.sbpack`.
    Move(ResourcePath),
    /// Already under `packages/`, only listed under the wrong key.
    Relist(ResourcePath),
}

impl PendingPackage {
    fn resource(&self) -> &ResourcePath {
        match self {
            PendingPackage::Move(rp) | PendingPackage::Relist(rp) => rp,
        }
    }
}

/// Relative and free of `..`, so joining it onto the root cannot leave the project.
fn stays_inside_project(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Moves resource folders under `packages/` and lists every package under `packages`.
pub struct PackageMigrator {
    project: Project,
    journal: CommandJournal,
}

impl PackageMigrator {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            journal: CommandJournal::new(),
        }
    }

    /// Entries of `resourcePaths` this migrator will handle. Paths reaching
    /// outside the project root are never touched.
    pub fn pending(settings: &ProjectSettings) -> Vec<PendingPackage> {
        settings
            .resource_paths
            .iter()
            .filter_map(|rp| {
                let path = Path::new(&rp.path);
                if !stays_inside_project(path) {
                    tracing::warn!(
                        "resource path `{}` points outside the project, leaving it alone",
                        rp.path
                    );
                    None
                } else if path.starts_with(PACKAGES_DIR_NAME) {
                    Some(PendingPackage::Relist(rp.clone()))
                } else {
                    Some(PendingPackage::Move(rp.clone()))
                }
            })
            .collect()
    }

    fn package_name(resource: &ResourcePath) -> MigrationResult<String> {
        Path::new(&resource.path)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                MigrationError::failed(
                    "packages",
                    format!("resource path `{}` has no directory name", resource.path),
                )
            })
    }

    fn package_dir(&self, name: &str) -> MigrationResult<PathBuf> {
        self.project
            .get_resource(Resource::Package(name.to_owned()))
            .ok_or_else(|| MigrationError::failed("packages", "layout has no package location"))
    }
}

impl Migrator for PackageMigrator {
    fn html_info_text(&self) -> String {
        let pending = match self.project.load_settings() {
            Ok((_, settings)) => Self::pending(&settings),
            Err(_) => Vec::new(),
        };
        if pending.is_empty() {
            return "<p>All resource folders are already packages.</p>".to_owned();
        }
        let items: String = pending
            .iter()
            .map(|entry| match entry {
                PendingPackage::Move(rp) => format!(
                    "<li>move <code>{}</code> into <code>{PACKAGES_DIR_NAME}/</code></li>",
                    escape_html(&rp.path)
                ),
                PendingPackage::Relist(rp) => format!(
                    "<li>list <code>{}</code> as a package</li>",
                    escape_html(&rp.path)
                ),
            })
            .collect();
        format!(
            "<p>Convert {} resource folder(s) to <code>.{PACKAGE_EXTENSION}</code> packages:</p>\
             <ul>{items}</ul>",
            pending.len()
        )
    }

    fn is_migration_required(&self) -> bool {
        if self.project.settings_path().is_none() {
            return false;
        }
        match self.project.load_settings() {
            Ok((_, settings)) => !Self::pending(&settings).is_empty(),
            Err(e) => {
                tracing::warn!("{e}");
                true
            }
        }
    }

    fn migrate(&mut self) -> MigrationResult<()> {
        let (path, mut settings) = self.project.load_settings()?;
        let pending = Self::pending(&settings);
        if pending.is_empty() {
            return Ok(());
        }

        self.journal.run(BackupFile::new(&path))?;
        if pending.iter().any(|p| matches!(p, PendingPackage::Move(_))) {
            let packages_dir = self.project.get_resource(Resource::Packages).ok_or_else(|| {
                MigrationError::failed("packages", "layout has no packages directory")
            })?;
            self.journal.run(CreateDirectory::new(packages_dir))?;
        }

        for entry in &pending {
            let package = match entry {
                PendingPackage::Move(resource) => {
                    let name = Self::package_name(resource)?;
                    let source = self.project.root.join(&resource.path);
                    let target = self.package_dir(&name)?;
                    self.journal.run(MoveFile::new(source, target))?;
                    tracing::debug!("packaged {}", resource.path);
                    ResourcePath::new(format!("{PACKAGES_DIR_NAME}/{name}.{PACKAGE_EXTENSION}"))
                }
                PendingPackage::Relist(resource) => resource.clone(),
            };

            settings.resource_paths.retain(|rp| rp != entry.resource());
            if !settings.packages.contains(&package) {
                settings.packages.push(package);
            }
        }

        self.project.save_settings(&path, &settings)?;
        tracing::info!(
            "converted {} resource folder(s) to packages for {}",
            pending.len(),
            self.project.root.display()
        );
        Ok(())
    }

    fn rollback(&mut self) -> MigrationResult<()> {
        self.journal.undo_all()
    }

    fn as_tidy_up(&mut self) -> Option<&mut dyn TidyUp> {
        Some(self)
    }

    fn name(&self) -> &'static str {
        "packages"
    }
}

impl TidyUp for PackageMigrator {
    fn tidy_up(&mut self) -> MigrationResult<()> {
        self.journal.tidy_up_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SETTINGS: &str =
        r#"{ "version": 2, "resourcePaths": [{ "path": "Art" }, { "path": "packages/Fonts.sbpack" }] }"#;

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Game.sbproj"), SETTINGS).unwrap();
        fs::create_dir_all(dir.path().join("Art")).unwrap();
        fs::write(dir.path().join("Art").join("hero.png"), "png").unwrap();
        fs::create_dir_all(dir.path().join("packages").join("Fonts.sbpack")).unwrap();
        dir
    }

    #[test]
    fn test_resource_folders_become_packages() {
        let dir = project();
        let mut migrator = PackageMigrator::new(Project::open(dir.path()));
        assert!(migrator.is_migration_required());
        assert!(migrator.html_info_text().contains("<code>Art</code>"));

        migrator.migrate().unwrap();
        migrator.as_tidy_up().unwrap().tidy_up().unwrap();

        assert!(!migrator.is_migration_required());
        assert!(
            dir.path()
                .join("packages")
                .join("Art.sbpack")
                .join("hero.png")
                .exists()
        );
        let (_, settings) = Project::open(dir.path()).load_settings().unwrap();
        assert!(settings.resource_paths.is_empty());
        assert_eq!(
            settings.packages,
            vec![
                ResourcePath::new("packages/Art.sbpack"),
                ResourcePath::new("packages/Fonts.sbpack")
            ]
        );
    }

    #[test]
    fn test_rollback_moves_folders_back() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Game.sbproj"),
            r#"{ "version": 2, "resourcePaths": ["Art"] }"#,
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("Art")).unwrap();
        let original = fs::read_to_string(dir.path().join("Game.sbproj")).unwrap();

        let mut migrator = PackageMigrator::new(Project::open(dir.path()));
        migrator.migrate().unwrap();
        assert!(dir.path().join("packages").is_dir());

        migrator.rollback().unwrap();
        assert!(dir.path().join("Art").is_dir());
        assert!(!dir.path().join("packages").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("Game.sbproj")).unwrap(),
            original
        );
    }

    #[test]
    fn test_missing_resource_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Game.sbproj"),
            r#"{ "version": 2, "resourcePaths": ["Gone"] }"#,
        )
        .unwrap();
        let mut migrator = PackageMigrator::new(Project::open(dir.path()));

        assert!(migrator.migrate().is_err());
        migrator.rollback().unwrap();
        assert!(!dir.path().join("packages").exists());
    }

    #[test]
    fn test_paths_outside_project_are_left_alone() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("Game");
        let shared = outer.path().join("Shared");
        fs::create_dir_all(root.join("Art")).unwrap();
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("x.png"), "png").unwrap();
        let settings = serde_json::json!({
            "version": 2,
            "resourcePaths": ["../Shared", shared.to_string_lossy(), "Art/../../Shared"],
        });
        fs::write(root.join("Game.sbproj"), settings.to_string()).unwrap();

        let mut migrator = PackageMigrator::new(Project::open(&root));
        assert!(!migrator.is_migration_required());
        migrator.migrate().unwrap();

        assert!(shared.join("x.png").exists());
        assert!(!root.join("packages").exists());
        assert!(root.join("Art").is_dir());
    }

    #[test]
    fn test_outside_path_does_not_block_loose_folders() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("Game");
        fs::create_dir_all(root.join("Art")).unwrap();
        fs::create_dir_all(outer.path().join("Shared")).unwrap();
        fs::write(
            root.join("Game.sbproj"),
            r#"{ "version": 2, "resourcePaths": ["../Shared", "Art"] }"#,
        )
        .unwrap();

        let mut migrator = PackageMigrator::new(Project::open(&root));
        migrator.migrate().unwrap();

        assert!(!migrator.is_migration_required());
        assert!(outer.path().join("Shared").is_dir());
        assert!(root.join("packages").join("Art.sbpack").is_dir());
        let (_, settings) = Project::open(&root).load_settings().unwrap();
        assert_eq!(settings.resource_paths, vec![ResourcePath::new("../Shared")]);
    }

    #[test]
    fn test_tidy_up_without_migration_is_a_no_op() {
        let dir = project();
        let before = fs::read_to_string(dir.path().join("Game.sbproj")).unwrap();
        let mut migrator = PackageMigrator::new(Project::open(dir.path()));

        migrator.as_tidy_up().unwrap().tidy_up().unwrap();

        assert!(migrator.is_migration_required());
        assert!(dir.path().join("Art").join("hero.png").exists());
        assert_eq!(
            fs::read_to_string(dir.path().join("Game.sbproj")).unwrap(),
            before
        );
    }
}
