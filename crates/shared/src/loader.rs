use crate::version::{Persistor, Upgrader, Versioned};
use anyhow::{Context, Result};

pub struct Loader<V: Versioned> {
    pub value: V,
}

impl<V: Versioned> Loader<V> {
    /// Loads the stored value (or the default), upgrading and re-saving it when stale.
    pub fn load<U, P>(upgrader: U, persistor: P, latest_version: usize) -> Result<Self>
    where
        U: Upgrader<V>,
        P: Persistor<V>,
    {
        let mut value = persistor.load()?.unwrap_or_default();

        if !value.is_up_to_date(latest_version) {
            let from = value.version();
            value = upgrader
                .upgrade(value, latest_version)
                .with_context(|| format!("upgrade from version {from} failed"))?;
            // Save upgraded value
            persistor.save(&value)?;
            tracing::info!("upgraded stored value from version {from} to {latest_version}");
        }

        Ok(Self { value })
    }

    pub fn into_inner(self) -> V {
        self.value
    }
}
