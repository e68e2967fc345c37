use log::{info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::DatasetConfig;
use crate::dataset::DetDataset;
use crate::errors::{DatasetError, DatasetResult};
use crate::types::{
    AnnotationLine, ImageRecord, LabelMap, ParseStats, LABEL_LIST_FILE, LOGO_CLASS_ID,
};
use crate::utils::{image_field, load_label_map, parse_bbox, read_lines, split_fields};

/// Registered name of the logo dataset type
pub const LOGO_DATASET: &str = "LogoDataSet";

/// Loader for the comma separated logo annotation format.
///
/// The dataset root holds `label_list.txt` and the annotation file. Each
/// annotation row is `image_path,_,_,x1,y1,x2,y2[,...]`; every row whose image
/// exists on disk becomes its own record with a fresh id.
#[derive(Debug, Clone)]
pub struct LogoDataset {
    dataset_dir: PathBuf,
    image_dir: Option<PathBuf>,
    anno_path: PathBuf,
    sample_num: i64,
    data_fields: Vec<String>,
    label_list: Option<PathBuf>,
    roidbs: Vec<ImageRecord>,
    cname2cid: Vec<String>,
    label_map: LabelMap,
    stats: ParseStats,
}

impl LogoDataset {
    pub fn new(config: DatasetConfig) -> Self {
        let DatasetConfig {
            dataset_dir,
            image_dir,
            anno_path,
            sample_num,
            data_fields,
            label_list,
            ..
        } = config;

        Self {
            dataset_dir,
            image_dir,
            anno_path,
            sample_num,
            data_fields,
            label_list,
            roidbs: Vec::new(),
            cname2cid: Vec::new(),
            label_map: LabelMap::default(),
            stats: ParseStats::default(),
        }
    }

    pub fn dataset_dir(&self) -> &Path {
        &self.dataset_dir
    }

    pub fn image_dir(&self) -> Option<&Path> {
        self.image_dir.as_deref()
    }

    /// Configured sample limit. Stored for the consumer, parsing always reads every row.
    pub fn sample_num(&self) -> i64 {
        self.sample_num
    }

    pub fn label_list(&self) -> Option<&Path> {
        self.label_list.as_deref()
    }

    /// Name to id mapping read from the label file
    pub fn label_map(&self) -> &LabelMap {
        &self.label_map
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Parse one annotation row into its image path and box.
    ///
    /// Returns `Ok(None)` when the row's image is missing on disk; the box
    /// columns are only read once the image is known to exist.
    fn parse_line(
        &self,
        anno_path: &Path,
        line_no: usize,
        line: &str,
    ) -> DatasetResult<Option<AnnotationLine>> {
        let fields = split_fields(line);
        let image_file = image_field(&fields);
        if !Path::new(image_file).exists() {
            warn!(
                "Illegal image file: {}, and it will be ignored",
                image_file
            );
            return Ok(None);
        }

        let bbox = parse_bbox(&fields).map_err(|reason| DatasetError::MalformedLine {
            path: anno_path.to_path_buf(),
            line_no,
            reason,
        })?;

        Ok(Some(AnnotationLine {
            image_file: image_file.to_string(),
            bbox,
        }))
    }

    fn load_records(&self, anno_path: &Path) -> DatasetResult<(Vec<ImageRecord>, ParseStats)> {
        let mut stats = ParseStats::default();
        let mut order: Vec<usize> = Vec::new();
        let mut tmp_records: HashMap<usize, ImageRecord> = HashMap::new();
        let mut idx = 0;

        for (line_no, line) in read_lines(anno_path)?.iter().enumerate() {
            // A blank row ends the annotation list
            if line.trim().is_empty() {
                stats.stopped_at_blank_line = true;
                break;
            }

            let annotation = match self.parse_line(anno_path, line_no + 1, line)? {
                Some(annotation) => annotation,
                None => {
                    stats.skipped_missing_image += 1;
                    continue;
                }
            };
            let im_id = idx;
            idx += 1;
            stats.accepted_lines += 1;

            let mut record = ImageRecord::new(&annotation.image_file, im_id);
            if annotation.has_valid_bbox() {
                record.push_box(annotation.record_bbox(), LOGO_CLASS_ID, 0);
            } else {
                let [x1, y1, x2, y2] = annotation.bbox;
                warn!(
                    "Found an invalid bbox in annotations: img_file: {}, x1: {}, y1: {}, x2: {}, y2: {}.",
                    annotation.image_file, x1, y1, x2, y2
                );
                stats.invalid_bboxes += 1;
            }

            match tmp_records.get_mut(&im_id) {
                Some(existing) => existing.merge(record),
                None => {
                    order.push(im_id);
                    tmp_records.insert(im_id, record);
                }
            }
        }

        stats.print_summary();

        let records = order
            .into_iter()
            .filter_map(|im_id| tmp_records.remove(&im_id))
            .collect();
        Ok((records, stats))
    }
}

impl DetDataset for LogoDataset {
    fn parse_dataset(&mut self) -> DatasetResult<()> {
        let anno_path = self.get_anno();
        let label_path = self.get_label_list();

        // The annotation file is the one checked, the wording is kept as is
        if !anno_path.exists() {
            return Err(DatasetError::Configuration(format!(
                "label_list {} does not exists",
                anno_path.display()
            )));
        }

        let label_map = load_label_map(&label_path)?;
        let (records, stats) = self.load_records(&anno_path)?;
        if records.is_empty() {
            return Err(DatasetError::Validation(format!(
                "not found any voc record in {}",
                self.anno_path.display()
            )));
        }

        info!(
            "{} samples in file {}",
            label_map.len(),
            anno_path.display()
        );

        self.roidbs = records;
        self.cname2cid = label_map.sorted_names();
        self.label_map = label_map;
        self.stats = stats;
        Ok(())
    }

    fn get_label_list(&self) -> PathBuf {
        self.dataset_dir.join(LABEL_LIST_FILE)
    }

    fn get_anno(&self) -> PathBuf {
        self.dataset_dir.join(&self.anno_path)
    }

    fn records(&self) -> &[ImageRecord] {
        &self.roidbs
    }

    /// Category names sorted alphabetically, not in id order.
    fn categories(&self) -> &[String] {
        &self.cname2cid
    }

    fn data_fields(&self) -> &[String] {
        &self.data_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn dataset_in(dir: &Path) -> LogoDataset {
        LogoDataset::new(DatasetConfig::new(dir, "anno.txt"))
    }

    #[test]
    fn test_get_label_list_without_files() {
        let dataset = dataset_in(Path::new("/does/not/exist"));

        assert_eq!(
            dataset.get_label_list(),
            PathBuf::from("/does/not/exist/label_list.txt")
        );
        assert_eq!(dataset.get_anno(), PathBuf::from("/does/not/exist/anno.txt"));
    }

    #[test]
    fn test_missing_annotation_reports_label_wording() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(LABEL_LIST_FILE), "logo\n").unwrap();
        let mut dataset = dataset_in(temp_dir.path());

        let err = dataset.parse_dataset().unwrap_err();

        match err {
            DatasetError::Configuration(msg) => {
                assert!(msg.starts_with("label_list "));
                assert!(msg.ends_with("anno.txt does not exists"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_label_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("anno.txt"), "").unwrap();
        let mut dataset = dataset_in(temp_dir.path());

        let err = dataset.parse_dataset().unwrap_err();

        assert!(matches!(err, DatasetError::Io { .. }));
    }

    #[test]
    fn test_malformed_line_after_existing_image() {
        let temp_dir = tempfile::tempdir().unwrap();
        let image = temp_dir.path().join("a.jpg");
        fs::write(&image, b"").unwrap();
        fs::write(temp_dir.path().join(LABEL_LIST_FILE), "logo\n").unwrap();
        fs::write(
            temp_dir.path().join("anno.txt"),
            format!("{},w,h,1,2\n", image.display()),
        )
        .unwrap();
        let mut dataset = dataset_in(temp_dir.path());

        let err = dataset.parse_dataset().unwrap_err();

        match err {
            DatasetError::MalformedLine { line_no, .. } => assert_eq!(line_no, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_line_with_missing_image_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let image = temp_dir.path().join("a.jpg");
        fs::write(&image, b"").unwrap();
        fs::write(temp_dir.path().join(LABEL_LIST_FILE), "logo\n").unwrap();
        fs::write(
            temp_dir.path().join("anno.txt"),
            format!(
                "{},short\n{},w,h,1,2,3,4\n",
                temp_dir.path().join("gone.jpg").display(),
                image.display()
            ),
        )
        .unwrap();
        let mut dataset = dataset_in(temp_dir.path());

        dataset.parse_dataset().unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.stats().skipped_missing_image, 1);
        assert_eq!(dataset.records()[0].im_id, 0);
    }
}
