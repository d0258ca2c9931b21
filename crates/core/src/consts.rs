use const_format::formatcp;

pub const APP_NAME: &str = "sbmigrate";

pub const PROJECT_EXTENSION: &str = "sbproj";
pub const LEGACY_PROJECT_EXTENSION: &str = "ccbproj";
pub const DOCUMENT_EXTENSION: &str = "sb";
pub const LEGACY_DOCUMENT_EXTENSION: &str = "ccb";
pub const PACKAGE_EXTENSION: &str = "sbpack";
pub const PACKAGES_DIR_NAME: &str = "packages";

/// Backups live next to the original as `.<name>.<uuid>.sbmigrate-backup`.
pub const BACKUP_EXTENSION: &str = formatcp!("{APP_NAME}-backup");

pub const LATEST_SETTINGS_VERSION: usize = 2;

#[test]
fn test_const() {
    assert_eq!(BACKUP_EXTENSION, "sbmigrate-backup");
}
