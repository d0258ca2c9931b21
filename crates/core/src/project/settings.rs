use anyhow::Result;
use sbmigrate_shared::{upgrader::StepUpgrader, version::Versioned};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::LATEST_SETTINGS_VERSION;

/// Settings files written before versioning was introduced carry no `version` key.
const UNVERSIONED: usize = 1;

fn unversioned() -> usize {
    UNVERSIONED
}

/// The project document. Only the keys migrations care about are typed;
/// everything else is carried through untouched.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default = "unversioned")]
    pub version: usize,
    #[serde(default)]
    pub resource_paths: Vec<ResourcePath>,
    #[serde(default)]
    pub packages: Vec<ResourcePath>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            version: LATEST_SETTINGS_VERSION,
            resource_paths: Vec::new(),
            packages: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Versioned for ProjectSettings {
    #[inline(always)]
    fn version(&self) -> usize {
        self.version
    }
}

/// A directory, relative to the project root. Older files store a bare string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(from = "ResourcePathRepr")]
pub struct ResourcePath {
    pub path: String,
}

impl ResourcePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ResourcePathRepr {
    Plain(String),
    Entry { path: String },
}

impl From<ResourcePathRepr> for ResourcePath {
    fn from(repr: ResourcePathRepr) -> Self {
        match repr {
            ResourcePathRepr::Plain(path) | ResourcePathRepr::Entry { path } => Self { path },
        }
    }
}

pub fn settings_upgrader() -> StepUpgrader<ProjectSettings> {
    StepUpgrader::new().step(1, normalize_resource_paths)
}

/// Version 1 -> 2: trailing separators trimmed, empty and duplicate entries dropped.
fn normalize_resource_paths(mut settings: ProjectSettings) -> Result<ProjectSettings> {
    settings.resource_paths = normalized(settings.resource_paths);
    settings.packages = normalized(settings.packages);
    settings.version = 2;
    Ok(settings)
}

fn normalized(paths: Vec<ResourcePath>) -> Vec<ResourcePath> {
    let mut seen = Vec::<ResourcePath>::with_capacity(paths.len());
    for entry in paths {
        let trimmed = entry.path.trim_end_matches(['/', '\\']);
        if trimmed.is_empty() {
            continue;
        }
        let entry = ResourcePath::new(trimmed);
        if !seen.contains(&entry) {
            seen.push(entry);
        }
    }
    seen
}
