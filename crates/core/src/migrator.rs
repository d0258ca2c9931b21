use crate::error::MigrationResult;

/// One discrete upgrade step for a project.
///
/// Operations are synchronous and may block on the file system. Implementations
/// are not expected to be `Sync`; a driver calls them from one thread at a time.
pub trait Migrator {
    /// Markup-capable description of what `migrate` will do. Never empty.
    fn html_info_text(&self) -> String;

    /// Whether the project, as it is right now, still needs this step.
    ///
    /// Must answer the same way when asked twice without the project changing
    /// in between, and must answer `false` after a successful `migrate`.
    fn is_migration_required(&self) -> bool;

    fn migrate(&mut self) -> MigrationResult<()>;

    /// Reverts whatever a previous `migrate` call managed to do, complete or not.
    fn rollback(&mut self) -> MigrationResult<()>;

    /// Cleanup capability, for migrators that leave something behind until the
    /// whole migration has succeeded.
    fn as_tidy_up(&mut self) -> Option<&mut dyn TidyUp> {
        None
    }

    #[inline(always)]
    fn name(&self) -> &'static str {
        "Migrator"
    }
}

pub trait TidyUp {
    /// Called at most once, after every migrator of a run succeeded.
    fn tidy_up(&mut self) -> MigrationResult<()>;
}

pub type BoxedMigrator = Box<dyn Migrator + Send>;

/// For interpolating file names and error messages into info text.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;
    impl Migrator for Plain {
        fn html_info_text(&self) -> String {
            "<p>Nothing to see.</p>".to_owned()
        }
        fn is_migration_required(&self) -> bool {
            false
        }
        fn migrate(&mut self) -> MigrationResult<()> {
            Ok(())
        }
        fn rollback(&mut self) -> MigrationResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tidy_up_is_opt_in() {
        let mut migrator: BoxedMigrator = Box::new(Plain);
        assert!(migrator.as_tidy_up().is_none());
        assert_eq!(migrator.name(), "Migrator");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b> & \"x\""), "&lt;b&gt; &amp; &quot;x&quot;");
    }
}
