use log::info;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dataset::DetDataset;
use crate::errors::DatasetResult;
use crate::types::ImageRecord;
use crate::utils::write_json;

/// Parsed dataset as written to disk for the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDump {
    pub anno_path: PathBuf,
    pub data_fields: Vec<String>,
    pub categories: Vec<String>,
    pub records: Vec<ImageRecord>,
}

impl DatasetDump {
    pub fn from_dataset(dataset: &dyn DetDataset) -> Self {
        Self {
            anno_path: dataset.get_anno(),
            data_fields: dataset.data_fields().to_vec(),
            categories: dataset.categories().to_vec(),
            records: dataset.records().to_vec(),
        }
    }
}

/// Write the parsed records and category names of a dataset as JSON
pub fn write_dataset_json(output_path: &Path, dataset: &dyn DetDataset) -> DatasetResult<()> {
    let dump = DatasetDump::from_dataset(dataset);
    write_json(output_path, &dump)?;
    info!(
        "Wrote {} records to {}",
        dump.records.len(),
        output_path.display()
    );
    Ok(())
}
