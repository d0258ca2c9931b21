use anyhow::Result;

pub trait Versioned: Default {
    fn version(&self) -> usize;
    fn is_up_to_date(&self, latest_version: usize) -> bool {
        self.version() >= latest_version
    }
}

/// Brings a stored value up to `target_version`.
pub trait Upgrader<V: Versioned> {
    fn upgrade(&self, value: V, target_version: usize) -> Result<V>;
}

pub trait Persistor<V> {
    fn save(&self, value: &V) -> Result<()>;
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<V>>;
}
