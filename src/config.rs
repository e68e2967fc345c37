use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::errors::{DatasetError, DatasetResult};
use crate::logo_dataset::LOGO_DATASET;

/// Command-line arguments for loading a logo detection dataset.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct Args {
    /// Root directory of the dataset, containing label_list.txt
    #[arg(short = 'd', long = "dataset_dir", required_unless_present = "config")]
    pub dataset_dir: Option<PathBuf>,

    /// Annotation file, relative to the dataset root
    #[arg(short = 'a', long = "anno_path", required_unless_present = "config")]
    pub anno_path: Option<PathBuf>,

    /// Image directory, relative to the dataset root
    #[arg(long = "image_dir")]
    pub image_dir: Option<PathBuf>,

    /// Number of samples to load, -1 means all
    #[arg(long = "sample_num", default_value_t = -1, allow_negative_numbers = true, value_parser = validate_sample_num)]
    pub sample_num: i64,

    /// Data fields handed to the training pipeline
    #[arg(long = "data_fields", value_delimiter = ',', default_value = "image")]
    pub data_fields: Vec<String>,

    /// YAML dataset description; takes precedence over the flags above
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Write the parsed records and category names to this JSON file
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// Resolve the dataset description, either from `--config` or from the flags
    pub fn to_dataset_config(&self) -> DatasetResult<DatasetConfig> {
        if let Some(config_path) = &self.config {
            return DatasetConfig::from_yaml_file(config_path);
        }

        let dataset_dir = self.dataset_dir.clone().ok_or_else(|| {
            DatasetError::Configuration("--dataset_dir is required without --config".to_string())
        })?;
        let anno_path = self.anno_path.clone().ok_or_else(|| {
            DatasetError::Configuration("--anno_path is required without --config".to_string())
        })?;

        Ok(DatasetConfig {
            name: LOGO_DATASET.to_string(),
            dataset_dir,
            image_dir: self.image_dir.clone(),
            anno_path,
            sample_num: self.sample_num,
            data_fields: self.data_fields.clone(),
            label_list: None,
        })
    }
}

/// Serializable description of a dataset, as found in training configs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Registered dataset type, e.g. `LogoDataSet`
    pub name: String,
    pub dataset_dir: PathBuf,
    #[serde(default)]
    pub image_dir: Option<PathBuf>,
    pub anno_path: PathBuf,
    #[serde(default = "default_sample_num")]
    pub sample_num: i64,
    #[serde(default = "default_data_fields")]
    pub data_fields: Vec<String>,
    #[serde(default)]
    pub label_list: Option<PathBuf>,
}

impl DatasetConfig {
    pub fn new(dataset_dir: impl Into<PathBuf>, anno_path: impl Into<PathBuf>) -> Self {
        Self {
            name: LOGO_DATASET.to_string(),
            dataset_dir: dataset_dir.into(),
            image_dir: None,
            anno_path: anno_path.into(),
            sample_num: default_sample_num(),
            data_fields: default_data_fields(),
            label_list: None,
        }
    }

    pub fn from_yaml_str(content: &str, origin: &Path) -> DatasetResult<Self> {
        serde_yaml::from_str(content).map_err(|source| DatasetError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_file(path: &Path) -> DatasetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        Self::from_yaml_str(&content, path)
    }
}

fn default_sample_num() -> i64 {
    -1
}

fn default_data_fields() -> Vec<String> {
    vec!["image".to_string()]
}

// Validate that the sample count is -1 (all) or non-negative
fn validate_sample_num(s: &str) -> Result<i64, String> {
    match i64::from_str(s) {
        Ok(val) if val >= -1 => Ok(val),
        _ => Err("SAMPLE_NUM must be -1 or a non-negative integer".to_string()),
    }
}
