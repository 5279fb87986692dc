//! Filesystem persistence for scenarios.

use crate::{Scenario, ScenarioError, ScenarioResult};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Stores scenarios as pretty-printed JSON documents, one file per
/// scenario, named `{name}.json` under a base directory.
#[derive(Debug, Clone)]
pub struct ScenarioStore {
    directory: PathBuf,
}

impl ScenarioStore {
    /// Opens a store rooted at `directory`, creating it if needed.
    pub fn new(directory: impl Into<PathBuf>) -> ScenarioResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory)?;
        Ok(Self { directory })
    }

    /// The store's base directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Saves a scenario under its name, overwriting any existing file.
    ///
    /// Names containing path separators are rejected so a scenario can
    /// never write outside the store directory.
    pub fn save(&self, scenario: &Scenario) -> ScenarioResult<PathBuf> {
        let path = self.path_for(&scenario.name)?;
        let json = serde_json::to_string_pretty(scenario)?;
        fs::write(&path, json)?;
        info!("saved scenario {} to {}", scenario.name, path.display());
        Ok(path)
    }

    /// Loads a scenario by name. Fails with `NotFound` when no file
    /// exists for the name.
    pub fn load(&self, name: &str) -> ScenarioResult<Scenario> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(ScenarioError::not_found(name));
        }
        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Names of all stored scenarios, sorted.
    pub fn list(&self) -> ScenarioResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Deletes a stored scenario. Fails with `NotFound` when absent.
    pub fn delete(&self, name: &str) -> ScenarioResult<()> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(ScenarioError::not_found(name));
        }
        fs::remove_file(path)?;
        Ok(())
    }

    fn path_for(&self, name: &str) -> ScenarioResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name.contains("..") {
            return Err(ScenarioError::invalid_input(format!(
                "invalid scenario name for storage: {name:?}"
            )));
        }
        Ok(self.directory.join(format!("{name}.json")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ShockSet;

    fn sample() -> Scenario {
        Scenario::new(
            "equity_down",
            "equity drawdown",
            ShockSet::new().with_factor("equity", -0.25).with_fx("EUR", -0.05),
        )
        .stamped()
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::new(dir.path()).unwrap();

        let scenario = sample();
        store.save(&scenario).unwrap();
        let loaded = store.load("equity_down").unwrap();
        assert_eq!(scenario, loaded);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::new(dir.path()).unwrap();

        let mut scenario = sample();
        store.save(&scenario).unwrap();
        scenario.description = "revised".to_string();
        store.save(&scenario).unwrap();

        assert_eq!(store.load("equity_down").unwrap().description, "revised");
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_list_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::new(dir.path()).unwrap();

        for name in ["zeta", "alpha", "mid"] {
            let mut scenario = sample();
            scenario.name = name.to_string();
            store.save(&scenario).unwrap();
        }
        assert_eq!(store.list().unwrap(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::new(dir.path()).unwrap();
        assert!(matches!(
            store.load("absent"),
            Err(ScenarioError::NotFound { .. })
        ));
    }

    #[test]
    fn test_rejects_path_traversal_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::new(dir.path()).unwrap();

        let mut scenario = sample();
        scenario.name = "../escape".to_string();
        assert!(matches!(
            store.save(&scenario),
            Err(ScenarioError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = ScenarioStore::new(dir.path()).unwrap();

        store.save(&sample()).unwrap();
        store.delete("equity_down").unwrap();
        assert!(store.list().unwrap().is_empty());
        assert!(matches!(
            store.delete("equity_down"),
            Err(ScenarioError::NotFound { .. })
        ));
    }
}
