use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// Label file name, always looked up directly under the dataset root
pub const LABEL_LIST_FILE: &str = "label_list.txt";

// Every box in this dataset belongs to the single logo class
pub const LOGO_CLASS_ID: i32 = 0;

// Annotation columns: image path first, box corners in columns 3..=6
pub const IMAGE_FIELD: usize = 0;
pub const BBOX_FIELDS: std::ops::RangeInclusive<usize> = 3..=6;
pub const MIN_FIELDS: usize = 7;

/// Category name to class id mapping, with the reverse lookup.
///
/// Ids are assigned from 0 in the order names are first seen; a repeated
/// name keeps the id it was first given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelMap {
    cname2cid: HashMap<String, usize>,
    cid2cname: Vec<String>,
}

impl LabelMap {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut label_map = LabelMap::default();
        for name in names {
            label_map.insert(name.as_ref());
        }
        label_map
    }

    fn insert(&mut self, name: &str) {
        if self.cname2cid.contains_key(name) {
            return;
        }
        let id = self.cid2cname.len();
        self.cname2cid.insert(name.to_string(), id);
        self.cid2cname.push(name.to_string());
    }

    pub fn id_of(&self, name: &str) -> Option<usize> {
        self.cname2cid.get(name).copied()
    }

    pub fn name_of(&self, id: usize) -> Option<&str> {
        self.cid2cname.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cid2cname.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cid2cname.is_empty()
    }

    /// Names in id order.
    pub fn names(&self) -> &[String] {
        &self.cid2cname
    }

    /// Names sorted alphabetically, independent of their ids.
    pub fn sorted_names(&self) -> Vec<String> {
        let mut names = self.cid2cname.clone();
        names.sort();
        names
    }
}

/// One row of the annotation file once its columns have been parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationLine {
    pub image_file: String,
    pub bbox: [f64; 4],
}

impl AnnotationLine {
    /// A box is usable only when it has positive width and height.
    pub fn has_valid_bbox(&self) -> bool {
        let [x1, y1, x2, y2] = self.bbox;
        x2 > x1 && y2 > y1
    }

    /// Box narrowed to the precision stored in records.
    pub fn record_bbox(&self) -> [f32; 4] {
        self.bbox.map(|v| v as f32)
    }
}

/// Ground truth for one image id, in the layout the training pipeline reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub im_file: PathBuf,
    pub im_id: usize,
    pub gt_bbox: Vec<[f32; 4]>,
    pub gt_class: Vec<i32>,
    pub difficult: Vec<i32>,
}

impl ImageRecord {
    pub fn new(im_file: impl Into<PathBuf>, im_id: usize) -> Self {
        Self {
            im_file: im_file.into(),
            im_id,
            gt_bbox: Vec::new(),
            gt_class: Vec::new(),
            difficult: Vec::new(),
        }
    }

    pub fn push_box(&mut self, bbox: [f32; 4], class_id: i32, difficult: i32) {
        self.gt_bbox.push(bbox);
        self.gt_class.push(class_id);
        self.difficult.push(difficult);
    }

    /// Append another record's ground truth, keeping this record's id and file.
    pub fn merge(&mut self, other: ImageRecord) {
        self.gt_bbox.extend(other.gt_bbox);
        self.gt_class.extend(other.gt_class);
        self.difficult.extend(other.difficult);
    }

    pub fn num_boxes(&self) -> usize {
        self.gt_bbox.len()
    }
}

// Counters collected over one pass of the annotation file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseStats {
    pub accepted_lines: usize,
    pub skipped_missing_image: usize,
    pub invalid_bboxes: usize,
    pub stopped_at_blank_line: bool,
}

impl ParseStats {
    pub fn print_summary(&self) {
        log::debug!("=== Parse Summary ===");
        log::debug!("Accepted lines: {}", self.accepted_lines);
        log::debug!("Invalid boxes: {}", self.invalid_bboxes);
        if self.stopped_at_blank_line {
            log::debug!("Stopped reading at the first blank line");
        }

        if self.skipped_missing_image > 0 {
            log::warn!(
                "Skipped {} annotation line(s) with a missing image file",
                self.skipped_missing_image
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_map_ignores_duplicates() {
        let label_map = LabelMap::from_names(["cat", "cat", "dog"]);

        assert_eq!(label_map.len(), 2);
        assert_eq!(label_map.id_of("cat"), Some(0));
        assert_eq!(label_map.id_of("dog"), Some(1));
        assert_eq!(label_map.name_of(1), Some("dog"));
        assert_eq!(label_map.name_of(2), None);
    }

    #[test]
    fn test_sorted_names_differ_from_id_order() {
        let label_map = LabelMap::from_names(["zebra", "apple"]);

        assert_eq!(label_map.names(), ["zebra", "apple"]);
        assert_eq!(label_map.sorted_names(), vec!["apple", "zebra"]);
    }

    #[test]
    fn test_has_valid_bbox() {
        let line = |bbox| AnnotationLine {
            image_file: "a.jpg".to_string(),
            bbox,
        };

        assert!(line([0.0, 0.0, 10.0, 10.0]).has_valid_bbox());
        assert!(!line([0.0, 0.0, 0.0, 0.0]).has_valid_bbox());
        assert!(!line([5.0, 0.0, 1.0, 10.0]).has_valid_bbox());
        assert!(!line([0.0, 10.0, 10.0, 10.0]).has_valid_bbox());
    }

    #[test]
    fn test_bbox_checked_before_narrowing() {
        let line = AnnotationLine {
            image_file: "a.jpg".to_string(),
            bbox: [16777216.0, 0.0, 16777217.0, 10.0],
        };

        assert!(line.has_valid_bbox());
        assert_eq!(line.record_bbox(), [16777216.0, 0.0, 16777216.0, 10.0]);
    }

    #[test]
    fn test_empty_label_map() {
        assert!(LabelMap::default().is_empty());
        assert!(!LabelMap::from_names(["logo"]).is_empty());
    }

    #[test]
    fn test_merge_keeps_first_id_and_file() {
        let mut first = ImageRecord::new("a.jpg", 3);
        first.push_box([0.0, 0.0, 1.0, 1.0], LOGO_CLASS_ID, 0);
        let mut second = ImageRecord::new("b.jpg", 7);
        second.push_box([1.0, 1.0, 2.0, 2.0], LOGO_CLASS_ID, 0);

        first.merge(second);

        assert_eq!(first.im_id, 3);
        assert_eq!(first.im_file, PathBuf::from("a.jpg"));
        assert_eq!(first.gt_bbox.len(), 2);
        assert_eq!(first.gt_class.len(), 2);
        assert_eq!(first.difficult.len(), 2);
    }
}
