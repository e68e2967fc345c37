use std::path::PathBuf;

use crate::errors::DatasetResult;
use crate::types::ImageRecord;

/// Common surface of a detection dataset source.
///
/// A dataset is configured up front, filled once by [`DetDataset::parse_dataset`],
/// and read-only afterwards.
pub trait DetDataset: std::fmt::Debug {
    /// Read the annotations from disk and store the resulting records.
    fn parse_dataset(&mut self) -> DatasetResult<()>;

    /// Path of the category name file.
    fn get_label_list(&self) -> PathBuf;

    /// Path of the annotation file.
    fn get_anno(&self) -> PathBuf;

    /// Records produced by the last successful parse.
    fn records(&self) -> &[ImageRecord];

    /// Category names, in the order this dataset exposes them.
    fn categories(&self) -> &[String];

    /// Data fields requested by the consumer of this dataset.
    fn data_fields(&self) -> &[String];

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}
