use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

use crate::{
    command::{CommandJournal, MoveFile},
    consts::{
        DOCUMENT_EXTENSION, LEGACY_DOCUMENT_EXTENSION, LEGACY_PROJECT_EXTENSION,
        PROJECT_EXTENSION,
    },
    error::MigrationResult,
    migrator::Migrator,
};

/// Renames files from one extension to another, leaving their contents alone.
pub struct ExtensionRenameMigrator {
    root: PathBuf,
    from: &'static str,
    to: &'static str,
    recursive: bool,
    name: &'static str,
    noun: &'static str,
    journal: CommandJournal,
}

impl ExtensionRenameMigrator {
    /// Every `.ccb` document anywhere in the project becomes `.sb`.
    pub fn documents(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            from: LEGACY_DOCUMENT_EXTENSION,
            to: DOCUMENT_EXTENSION,
            recursive: true,
            name: "rename-documents",
            noun: "document",
            journal: CommandJournal::new(),
        }
    }

    /// The `.ccbproj` file at the project root becomes `.sbproj`.
    pub fn project_file(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            from: LEGACY_PROJECT_EXTENSION,
            to: PROJECT_EXTENSION,
            recursive: false,
            name: "rename-project",
            noun: "project file",
            journal: CommandJournal::new(),
        }
    }

    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        collect(&self.root, self.from, self.recursive, &mut found);
        found.sort();
        found
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn collect(dir: &Path, extension: &str, recursive: bool, found: &mut Vec<PathBuf>) {
    let entries = match read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Failed to list {}: {e}", dir.display());
            return;
        }
    };
    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        // Links may lead out of the project or back up into it.
        if is_hidden(&path) || file_type.is_symlink() {
            continue;
        }
        if file_type.is_dir() {
            if recursive {
                collect(&path, extension, recursive, found);
            }
        } else if path.extension().is_some_and(|ext| ext == extension) {
            found.push(path);
        }
    }
}

impl Migrator for ExtensionRenameMigrator {
    fn html_info_text(&self) -> String {
        let count = self.candidates().len();
        if count == 0 {
            return format!(
                "<p>No <code>.{}</code> {} files left to rename.</p>",
                self.from, self.noun
            );
        }
        format!(
            "<p>Rename <b>{count}</b> {}{} from <code>.{}</code> to <code>.{}</code>.</p>",
            self.noun,
            if count == 1 { "" } else { "s" },
            self.from,
            self.to
        )
    }

    fn is_migration_required(&self) -> bool {
        !self.candidates().is_empty()
    }

    fn migrate(&mut self) -> MigrationResult<()> {
        let candidates = self.candidates();
        for path in &candidates {
            self.journal
                .run(MoveFile::new(path, path.with_extension(self.to)))?;
        }
        tracing::info!(
            "renamed {} {} file(s) under {}",
            candidates.len(),
            self.noun,
            self.root.display()
        );
        Ok(())
    }

    fn rollback(&mut self) -> MigrationResult<()> {
        self.journal.undo_all()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
