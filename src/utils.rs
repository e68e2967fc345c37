use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::errors::{DatasetError, DatasetResult};
use crate::types::{LabelMap, BBOX_FIELDS, IMAGE_FIELD, MIN_FIELDS};

/// Read a UTF-8 text file into its lines, without line terminators
pub fn read_lines(path: &Path) -> DatasetResult<Vec<String>> {
    let file = File::open(path).map_err(|e| DatasetError::io(path, e))?;
    BufReader::new(file)
        .lines()
        .collect::<std::io::Result<Vec<_>>>()
        .map_err(|e| DatasetError::io(path, e))
}

/// Build the category mapping from a label file, one name per line.
/// Blank lines are ignored and repeated names keep their first id.
pub fn load_label_map(label_path: &Path) -> DatasetResult<LabelMap> {
    let lines = read_lines(label_path)?;
    let label_map = LabelMap::from_names(
        lines
            .iter()
            .map(|line| line.trim())
            .filter(|name| !name.is_empty()),
    );
    debug!(
        "Loaded {} categories from {}",
        label_map.len(),
        label_path.display()
    );
    Ok(label_map)
}

/// Split an annotation row into its comma separated columns
pub fn split_fields(line: &str) -> Vec<&str> {
    line.trim().split(',').collect()
}

/// Image path column of a split row
pub fn image_field<'a>(fields: &[&'a str]) -> &'a str {
    fields.get(IMAGE_FIELD).copied().unwrap_or_default()
}

/// Parse the x1,y1,x2,y2 columns of a split row
pub fn parse_bbox(fields: &[&str]) -> Result<[f64; 4], String> {
    if fields.len() < MIN_FIELDS {
        return Err(format!(
            "expected at least {} fields, found {}",
            MIN_FIELDS,
            fields.len()
        ));
    }

    let mut bbox = [0.0f64; 4];
    for (slot, index) in bbox.iter_mut().zip(BBOX_FIELDS) {
        let raw = fields[index].trim();
        *slot = raw
            .parse::<f64>()
            .map_err(|e| format!("field {} ({:?}) is not a number: {}", index, raw, e))?;
    }
    Ok(bbox)
}

/// Write any serializable value to a pretty-printed JSON file
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> DatasetResult<()> {
    let file = File::create(path).map_err(|e| DatasetError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush().map_err(|e| DatasetError::io(path, e))
}
