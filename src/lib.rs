//! Logo detection dataset loader
//!
//! This library reads the comma separated logo annotation format, together with
//! its `label_list.txt`, into per-image detection records for a training pipeline.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod io;
pub mod logo_dataset;
pub mod registry;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::{Args, DatasetConfig};
pub use dataset::DetDataset;
pub use errors::{DatasetError, DatasetResult};
pub use io::{write_dataset_json, DatasetDump};
pub use logo_dataset::{LogoDataset, LOGO_DATASET};
pub use registry::DatasetRegistry;
pub use types::{AnnotationLine, ImageRecord, LabelMap, ParseStats, LABEL_LIST_FILE};
