use std::{
    fs::{self, read_to_string},
    io::ErrorKind,
    marker::PhantomData,
    path::PathBuf,
};

use crate::version::Persistor;
use anyhow::{Context, Result};

pub struct NoPersistor;
impl<V: Default> Persistor<V> for NoPersistor {
    fn load(&self) -> Result<Option<V>> {
        Ok(Some(V::default()))
    }

    fn save(&self, _value: &V) -> Result<()> {
        Ok(())
    }
}

/// Stores a value in a single text file using the given codec pair.
pub struct FilePersistor<V, Ser, De>
where
    Ser: Fn(&V) -> Result<String>,
    De: Fn(&str) -> Result<V>,
{
    pub ser: Ser,
    pub de: De,
    pub path: PathBuf,
    _marker: PhantomData<V>,
}

impl<V, Ser, De> FilePersistor<V, Ser, De>
where
    Ser: Fn(&V) -> Result<String>,
    De: Fn(&str) -> Result<V>,
{
    pub fn new(path: impl Into<PathBuf>, ser: Ser, de: De) -> Self {
        Self {
            ser,
            de,
            path: path.into(),
            _marker: PhantomData,
        }
    }
}

impl<V, Ser, De> Persistor<V> for FilePersistor<V, Ser, De>
where
    Ser: Fn(&V) -> Result<String>,
    De: Fn(&str) -> Result<V>,
{
    fn load(&self) -> Result<Option<V>> {
        let data = match read_to_string(&self.path) {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("read `{}` failed", self.path.display()));
            }
        };
        let value = (self.de)(&data)
            .with_context(|| format!("parse `{}` failed", self.path.display()))?;
        Ok(Some(value))
    }

    fn save(&self, value: &V) -> Result<()> {
        let data = (self.ser)(value)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write next to the target first so a crash never leaves a half-written file.
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, data)
            .with_context(|| format!("write `{}` failed", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("replace `{}` failed", self.path.display()))?;
        tracing::debug!("saved {}", self.path.display());
        Ok(())
    }
}

#[cfg(feature = "json")]
pub fn json_persistor<V: serde::Serialize + serde::de::DeserializeOwned>(
    path: impl Into<PathBuf>,
) -> FilePersistor<V, impl Fn(&V) -> Result<String>, impl Fn(&str) -> Result<V>> {
    FilePersistor::new(
        path,
        |v: &V| Ok(serde_json::to_string_pretty(v)?),
        |s: &str| Ok(serde_json::from_str(s)?),
    )
}

#[cfg(feature = "toml")]
pub fn toml_persistor<V: serde::Serialize + serde::de::DeserializeOwned>(
    path: impl Into<PathBuf>,
) -> FilePersistor<V, impl Fn(&V) -> Result<String>, impl Fn(&str) -> Result<V>> {
    FilePersistor::new(
        path,
        |v: &V| Ok(toml::to_string_pretty(v)?),
        |s: &str| Ok(toml::from_str(s)?),
    )
}
