use log::debug;
use std::collections::HashMap;

use crate::config::DatasetConfig;
use crate::dataset::DetDataset;
use crate::errors::{DatasetError, DatasetResult};
use crate::logo_dataset::{LogoDataset, LOGO_DATASET};

pub type DatasetConstructor = fn(DatasetConfig) -> Box<dyn DetDataset>;

/// Named dataset constructors, looked up by the `name` of a [`DatasetConfig`].
#[derive(Debug, Default, Clone)]
pub struct DatasetRegistry {
    constructors: HashMap<String, DatasetConstructor>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every dataset type shipped in this crate
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(LOGO_DATASET, build_logo_dataset);
        registry
    }

    /// Register a constructor, replacing any previous one under the same name
    pub fn register(&mut self, name: &str, constructor: DatasetConstructor) {
        if self
            .constructors
            .insert(name.to_string(), constructor)
            .is_some()
        {
            debug!("Dataset type {} re-registered", name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn build(&self, config: &DatasetConfig) -> DatasetResult<Box<dyn DetDataset>> {
        let constructor = self
            .constructors
            .get(&config.name)
            .ok_or_else(|| DatasetError::UnknownDataset(config.name.clone()))?;
        Ok(constructor(config.clone()))
    }
}

fn build_logo_dataset(config: DatasetConfig) -> Box<dyn DetDataset> {
    Box::new(LogoDataset::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_registry_builds_logo_dataset() {
        let registry = DatasetRegistry::with_builtin();
        let config = DatasetConfig::new("/data/logo", "train.txt");

        let dataset = registry.build(&config).unwrap();

        assert_eq!(registry.names(), vec![LOGO_DATASET]);
        assert!(registry.contains(LOGO_DATASET));
        assert!(!DatasetRegistry::new().contains(LOGO_DATASET));
        assert_eq!(dataset.get_anno(), PathBuf::from("/data/logo/train.txt"));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_unknown_dataset() {
        let registry = DatasetRegistry::new();
        let mut config = DatasetConfig::new("/data/logo", "train.txt");
        config.name = "VOCDataSet".to_string();

        match registry.build(&config) {
            Err(DatasetError::UnknownDataset(name)) => assert_eq!(name, "VOCDataSet"),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
