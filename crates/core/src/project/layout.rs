use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use crate::consts::{
    LEGACY_PROJECT_EXTENSION, PACKAGE_EXTENSION, PACKAGES_DIR_NAME, PROJECT_EXTENSION,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// The settings document, current name first, legacy name as fallback.
    ProjectFile,
    Packages,
    Package(String),
}

pub trait Layout: Send + Sync {
    fn get_resource(&self, root: &Path, resource: Resource) -> Option<PathBuf>;
}

pub trait Layoutable<L: Layout> {
    fn layout(&self) -> &L;
    fn root_path(&self) -> &Path;
    fn get_resource(&self, resource: Resource) -> Option<PathBuf> {
        self.layout().get_resource(self.root_path(), resource)
    }

    fn get_existing_resource(&self, resource: Resource) -> Option<PathBuf> {
        self.get_resource(resource).filter(|p| p.exists())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectLayout;

impl Layout for ProjectLayout {
    fn get_resource(&self, root: &Path, resource: Resource) -> Option<PathBuf> {
        match resource {
            Resource::ProjectFile => find_by_extension(root, PROJECT_EXTENSION)
                .or_else(|| find_by_extension(root, LEGACY_PROJECT_EXTENSION)),
            Resource::Packages => Some(root.join(PACKAGES_DIR_NAME)),
            Resource::Package(name) => Some(
                root.join(PACKAGES_DIR_NAME)
                    .join(format!("{name}.{PACKAGE_EXTENSION}")),
            ),
        }
    }
}

/// First regular file directly under `root` with the given extension, by name.
pub fn find_by_extension(root: &Path, extension: &str) -> Option<PathBuf> {
    let entries = match read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to list {}: {e}", root.display());
            return None;
        }
    };
    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == extension))
        .collect();
    found.sort();
    if found.len() > 1 {
        tracing::warn!(
            "{} `.{extension}` files in {}, using {}",
            found.len(),
            root.display(),
            found[0].display()
        );
    }
    found.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_project_file_prefers_current_extension() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Game.ccbproj"), "{}").unwrap();
        assert_eq!(
            ProjectLayout.get_resource(dir.path(), Resource::ProjectFile),
            Some(dir.path().join("Game.ccbproj"))
        );

        fs::write(dir.path().join("Game.sbproj"), "{}").unwrap();
        assert_eq!(
            ProjectLayout.get_resource(dir.path(), Resource::ProjectFile),
            Some(dir.path().join("Game.sbproj"))
        );
    }

    #[test]
    fn test_package_location() {
        assert_eq!(
            ProjectLayout.get_resource(Path::new("/p"), Resource::Package("Art".to_owned())),
            Some(PathBuf::from("/p/packages/Art.sbpack"))
        );
    }
}
