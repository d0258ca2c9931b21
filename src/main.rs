mod config;
mod prompt;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use sbmigrate_core::{
    AssumeYes, Confirmation, MigratorSelection, Outcome, migrators::MIGRATOR_NAMES,
    project_controller,
};
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

use config::CliConfig;
use prompt::{StdinConfirmation, plain_text};

#[derive(Parser)]
#[command(name = "sbmigrate")]
#[command(about = "Upgrade legacy editor projects to the current project layout", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report which migrations each project needs
    Check {
        #[arg(required = true)]
        projects: Vec<PathBuf>,

        /// Only consider these migrators
        #[arg(long, value_parser = MIGRATOR_NAMES)]
        only: Vec<String>,
    },

    /// Migrate projects, asking before each one
    Migrate {
        #[arg(required = true)]
        projects: Vec<PathBuf>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Only run these migrators
        #[arg(long, value_parser = MIGRATOR_NAMES)]
        only: Vec<String>,
    },
}

fn init_tracing(verbose: bool, log_filter: &str) {
    let filter = EnvFilter::try_from_env("SBMIGRATE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { log_filter }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn selection(config: &CliConfig, only: &[String]) -> Result<MigratorSelection> {
    if only.is_empty() {
        return Ok(config.migrators);
    }
    config.migrators.only(only).map_err(|name| {
        anyhow!(
            "unknown migrator `{name}`, expected one of: {}",
            MIGRATOR_NAMES.join(", ")
        )
    })
}

fn check(projects: &[PathBuf], selection: &MigratorSelection) {
    for project in projects {
        let controller = project_controller(project, selection);
        let required = controller.required();
        if required.is_empty() {
            println!("{}: up to date", project.display());
        } else {
            println!(
                "{}: migration required ({})\n{}",
                project.display(),
                required.join(", "),
                plain_text(&controller.html_info_text())
            );
        }
    }
}

/// Canonical project roots with duplicates dropped. Nested projects share files, so they are refused.
fn distinct_projects(projects: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut roots: Vec<PathBuf> = Vec::with_capacity(projects.len());
    for project in projects {
        let root = project
            .canonicalize()
            .with_context(|| format!("open project `{}` failed", project.display()))?;
        if roots.contains(&root) {
            tracing::debug!("{} given more than once", root.display());
            continue;
        }
        if let Some(outer) = roots.iter().find(|r| root.starts_with(r)) {
            bail!("project `{}` is inside project `{}`", root.display(), outer.display());
        }
        if let Some(inner) = roots.iter().find(|r| r.starts_with(&root)) {
            bail!("project `{}` is inside project `{}`", inner.display(), root.display());
        }
        roots.push(root);
    }
    Ok(roots)
}

async fn confirm(project: &Path, info: String) -> bool {
    let mut prompt = StdinConfirmation {
        project: project.to_path_buf(),
    };
    tokio::task::spawn_blocking(move || prompt.confirm(&info))
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("confirmation prompt failed: {e}");
            false
        })
}

/// Returns whether every project ended up migrated, skipped or up to date.
async fn migrate(
    projects: Vec<PathBuf>,
    selection: MigratorSelection,
    assume_yes: bool,
) -> Result<bool> {
    let projects = distinct_projects(projects)?;
    let mut tasks = JoinSet::new();

    // Ask everything up front, then let the confirmed projects migrate side by side.
    for project in projects {
        let mut controller = project_controller(&project, &selection);
        if !controller.is_migration_required() {
            println!("{}: up to date", project.display());
            continue;
        }
        if !assume_yes && !confirm(&project, controller.html_info_text()).await {
            println!("{}: skipped", project.display());
            continue;
        }

        tasks.spawn_blocking(move || {
            let outcome = controller.run(&mut AssumeYes);
            (project, outcome)
        });
    }

    let mut all_ok = true;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((project, Ok(Outcome::Migrated(report)))) => {
                println!(
                    "{}: migrated ({})",
                    project.display(),
                    report.applied.join(", ")
                );
                if !report.tidy_up_failures.is_empty() {
                    tracing::warn!(
                        "{}: cleanup incomplete for {}",
                        project.display(),
                        report.tidy_up_failures.join(", ")
                    );
                }
            }
            Ok((project, Ok(_))) => println!("{}: up to date", project.display()),
            Ok((project, Err(e))) => {
                tracing::error!("{}: {e}", project.display());
                all_ok = false;
            }
            Err(e) => {
                tracing::error!("migration task failed: {e}");
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

async fn run(cli: Cli, config: CliConfig) -> Result<bool> {
    match cli.command {
        Commands::Check { projects, only } => {
            check(&projects, &selection(&config, &only)?);
            Ok(true)
        }
        Commands::Migrate {
            projects,
            yes,
            only,
        } => {
            let selection = selection(&config, &only)?;
            migrate(projects, selection, yes || config.assume_yes).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match config::load(cli.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("sbmigrate: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(cli.verbose, &config.log_filter);

    match run(cli, config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_migrate() {
        let cli = Cli::try_parse_from([
            "sbmigrate", "migrate", "--yes", "--only", "settings", "A", "B",
        ])
        .unwrap();
        match cli.command {
            Commands::Migrate {
                projects,
                yes,
                only,
            } => {
                assert_eq!(projects, vec![PathBuf::from("A"), PathBuf::from("B")]);
                assert!(yes);
                assert_eq!(only, vec!["settings"]);
            }
            _ => panic!("expected migrate"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_migrator() {
        assert!(Cli::try_parse_from(["sbmigrate", "check", "--only", "bogus", "A"]).is_err());
    }

    #[test]
    fn test_selection_from_only() {
        let config = CliConfig::default();
        let picked = selection(&config, &["packages".to_owned()]).unwrap();
        assert!(picked.packages);
        assert!(!picked.settings);
        assert_eq!(selection(&config, &[]).unwrap(), config.migrators);
    }

    #[tokio::test]
    async fn test_migrate_with_assume_yes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Game.ccbproj"), "{}").unwrap();

        let ok = migrate(
            vec![dir.path().to_path_buf()],
            MigratorSelection::default(),
            true,
        )
        .await
        .unwrap();

        assert!(ok);
        assert!(dir.path().join("Game.sbproj").exists());
    }

    #[test]
    fn test_same_project_twice_is_migrated_once() {
        let dir = tempfile::tempdir().unwrap();
        let roots = distinct_projects(vec![
            dir.path().to_path_buf(),
            dir.path().join(".").join("..").join(dir.path().file_name().unwrap()),
        ])
        .unwrap();
        assert_eq!(roots, vec![dir.path().canonicalize().unwrap()]);
    }

    #[test]
    fn test_nested_projects_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("Inner");
        std::fs::create_dir_all(&inner).unwrap();

        assert!(distinct_projects(vec![dir.path().to_path_buf(), inner.clone()]).is_err());
        assert!(distinct_projects(vec![inner, dir.path().to_path_buf()]).is_err());
    }

    #[test]
    fn test_missing_project_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(distinct_projects(vec![dir.path().join("Gone")]).is_err());
    }

    #[tokio::test]
    async fn test_migrate_refuses_nested_projects_before_touching_files() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("Inner");
        std::fs::create_dir_all(&inner).unwrap();
        std::fs::write(inner.join("Game.ccbproj"), "{}").unwrap();

        let result = migrate(
            vec![dir.path().to_path_buf(), inner.clone()],
            MigratorSelection::default(),
            true,
        )
        .await;

        assert!(result.is_err());
        assert!(inner.join("Game.ccbproj").exists());
    }
}
