use anyhow::{Context, Result};
use dirs::config_dir;
use std::{fs::create_dir_all, path::PathBuf};

const PRESERVED_DIR: &str = ".sbmigrate";

#[derive(Debug, Clone)]
pub enum Scope {
    Config,
    Custom(PathBuf),
}

impl Scope {
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            Scope::Config => config_dir(),
            Scope::Custom(p) => Some(p.clone()),
        }
    }

    /// `<scope>/.sbmigrate/<id>[.<suffix>]`, creating the preserved directory on the way.
    pub fn get_full_path(&self, id: &str, suffix: Option<&str>) -> Result<PathBuf> {
        let mut path = self.path().context("There is no valid base path")?;
        path.push(PRESERVED_DIR);
        if !path.exists() {
            create_dir_all(&path)
                .with_context(|| format!("create `{}` failed", path.display()))?;
        }

        path.push(id);
        if let Some(suf) = suffix {
            path.set_extension(suf);
        }

        Ok(path)
    }
}
