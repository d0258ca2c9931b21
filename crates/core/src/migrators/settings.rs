use sbmigrate_shared::{
    upgrader::StepUpgrader,
    version::{Upgrader, Versioned},
};

use crate::{
    command::{BackupFile, CommandJournal},
    consts::LATEST_SETTINGS_VERSION,
    error::{MigrationError, MigrationResult},
    migrator::{Migrator, TidyUp, escape_html},
    project::{
        Project,
        settings::{ProjectSettings, settings_upgrader},
    },
};

/// Upgrades the project settings document to the latest version.
pub struct SettingsMigrator {
    project: Project,
    upgrader: StepUpgrader<ProjectSettings>,
    journal: CommandJournal,
}

impl SettingsMigrator {
    pub fn new(project: Project) -> Self {
        Self {
            project,
            upgrader: settings_upgrader(),
            journal: CommandJournal::new(),
        }
    }
}

impl Migrator for SettingsMigrator {
    fn html_info_text(&self) -> String {
        match self.project.load_settings() {
            Ok((path, settings)) if !settings.is_up_to_date(LATEST_SETTINGS_VERSION) => format!(
                "<p>Upgrade project settings <code>{}</code> from version {} to version {LATEST_SETTINGS_VERSION}. \
                 The original file is backed up until the migration completes.</p>",
                escape_html(&path.file_name().unwrap_or_default().to_string_lossy()),
                settings.version
            ),
            Ok(_) => "<p>Project settings are up to date.</p>".to_owned(),
            Err(_) if self.project.settings_path().is_none() => {
                "<p>No project settings file found.</p>".to_owned()
            }
            Err(e) => format!(
                "<p>Project settings cannot be read: {}</p>",
                escape_html(&e.to_string())
            ),
        }
    }

    fn is_migration_required(&self) -> bool {
        if self.project.settings_path().is_none() {
            return false;
        }
        match self.project.load_settings() {
            Ok((_, settings)) => !settings.is_up_to_date(LATEST_SETTINGS_VERSION),
            Err(e) => {
                // Let `migrate` report it instead of silently skipping a broken project.
                tracing::warn!("{e}");
                true
            }
        }
    }

    fn migrate(&mut self) -> MigrationResult<()> {
        let (path, settings) = self.project.load_settings()?;
        if settings.is_up_to_date(LATEST_SETTINGS_VERSION) {
            return Ok(());
        }
        let from = settings.version;

        self.journal.run(BackupFile::new(&path))?;
        let upgraded = self
            .upgrader
            .upgrade(settings, LATEST_SETTINGS_VERSION)
            .map_err(|e| MigrationError::settings(&path, format!("{e:#}")))?;
        self.project.save_settings(&path, &upgraded)?;

        tracing::info!(
            "upgraded {} from version {from} to {LATEST_SETTINGS_VERSION}",
            path.display()
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
        "settings"
    }
}

impl TidyUp for SettingsMigrator {
    fn tidy_up(&mut self) -> MigrationResult<()> {
        self.journal.tidy_up_all()
    }
}
