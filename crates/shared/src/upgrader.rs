use crate::version::{Upgrader, Versioned};
use anyhow::Result;

/// Leaves the value untouched, for values that have only ever had one layout.
pub struct NoUpgrader;
impl<V: Versioned> Upgrader<V> for NoUpgrader {
    fn upgrade(&self, value: V, _target_version: usize) -> Result<V> {
        Ok(value)
    }
}

/// Applies one step per version until the value reaches the target.
pub struct StepUpgrader<V> {
    steps: Vec<(usize, fn(V) -> Result<V>)>,
}

impl<V: Versioned> StepUpgrader<V> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Registers the step that lifts a value *from* `from_version` to the next one.
    pub fn step(mut self, from_version: usize, step: fn(V) -> Result<V>) -> Self {
        self.steps.push((from_version, step));
        self.steps.sort_by_key(|(from, _)| *from);
        self
    }
}

impl<V: Versioned> Default for StepUpgrader<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Versioned> Upgrader<V> for StepUpgrader<V> {
    fn upgrade(&self, mut value: V, target_version: usize) -> Result<V> {
        for (from, step) in &self.steps {
            if value.version() >= target_version {
                break;
            }
            if value.version() == *from {
                value = step(value)?;
                tracing::debug!("upgraded value from version {from} to {}", value.version());
            }
        }
        anyhow::ensure!(
            value.is_up_to_date(target_version),
            "no upgrade path from version {} to {target_version}",
            value.version()
        );
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::StepUpgrader;
    use crate::version::{Upgrader, Versioned};

    #[derive(Default, Debug)]
    struct Doc {
        version: usize,
        trail: Vec<usize>,
    }

    impl Versioned for Doc {
        fn version(&self) -> usize {
            self.version
        }
    }

    fn bump(mut doc: Doc) -> anyhow::Result<Doc> {
        doc.trail.push(doc.version);
        doc.version += 1;
        Ok(doc)
    }

    #[test]
    fn test_steps_run_in_version_order() {
        let upgrader = StepUpgrader::<Doc>::new().step(2, bump).step(1, bump);
        let doc = upgrader
            .upgrade(Doc { version: 1, trail: vec![] }, 3)
            .unwrap();
        assert_eq!(doc.version, 3);
        assert_eq!(doc.trail, vec![1, 2]);
    }

    #[test]
    fn test_missing_step_is_an_error() {
        let upgrader = StepUpgrader::<Doc>::new().step(1, bump);
        assert!(upgrader.upgrade(Doc { version: 0, trail: vec![] }, 2).is_err());
    }
}
