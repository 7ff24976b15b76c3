use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::aligner::StimulusInterval;
use super::constants::{EVENT_DATATYPE, META_SUFFIX, NAME_COLUMN, START_COLUMN, STOP_COLUMN};
use super::error::EventDatasetError;

// Layout on disk
// stim_times.csv            - start,name,stop (one row per interval)
// stim_times.csv.meta.yaml  - datatype: 2001, columns: {name: {units: null}, start: {units: s}, stop: {units: s}}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub units: Option<String>,
}

/// Sidecar metadata for a Bark event dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub columns: BTreeMap<String, ColumnInfo>,
    pub datatype: u32,
}

impl Default for EventMetadata {
    fn default() -> Self {
        let mut columns = BTreeMap::new();
        columns.insert(String::from(NAME_COLUMN), ColumnInfo { units: None });
        columns.insert(
            String::from(START_COLUMN),
            ColumnInfo {
                units: Some(String::from("s")),
            },
        );
        columns.insert(
            String::from(STOP_COLUMN),
            ColumnInfo {
                units: Some(String::from("s")),
            },
        );
        Self {
            columns,
            datatype: EVENT_DATATYPE,
        }
    }
}

/// A Bark interval event dataset: a CSV table plus a `.meta.yaml` sidecar
#[derive(Debug, Clone)]
pub struct EventDataset {
    path: PathBuf,
}

impl EventDataset {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn get_path(&self) -> &Path {
        &self.path
    }

    pub fn get_metadata_path(&self) -> PathBuf {
        let mut meta = self.path.clone().into_os_string();
        meta.push(META_SUFFIX);
        PathBuf::from(meta)
    }

    /// Write the intervals and their metadata. Both files are rendered before either is created
    pub fn write(&self, intervals: &[StimulusInterval]) -> Result<(), EventDatasetError> {
        let mut table = format!("{START_COLUMN},{NAME_COLUMN},{STOP_COLUMN}\n");
        for interval in intervals.iter() {
            table.push_str(&format!(
                "{},{},{}\n",
                interval.start,
                quote_field(&interval.name),
                interval.stop
            ));
        }
        let meta = serde_yaml::to_string(&EventMetadata::default())?;

        std::fs::write(&self.path, table)?;
        std::fs::write(self.get_metadata_path(), meta)?;
        log::info!(
            "Wrote {} stimulus intervals to {}",
            intervals.len(),
            self.path.to_string_lossy()
        );
        Ok(())
    }

    pub fn read_metadata(&self) -> Result<EventMetadata, EventDatasetError> {
        let meta_path = self.get_metadata_path();
        if !meta_path.exists() {
            return Err(EventDatasetError::BadFilePath(meta_path));
        }
        let yaml_str = std::fs::read_to_string(&meta_path)?;
        Ok(serde_yaml::from_str::<EventMetadata>(&yaml_str)?)
    }

    /// Read intervals back. Columns are located by header name, so their order does not matter
    pub fn read(&self) -> Result<Vec<StimulusInterval>, EventDatasetError> {
        if !self.path.exists() {
            return Err(EventDatasetError::BadFilePath(self.path.clone()));
        }
        let meta = self.read_metadata()?;
        if meta.datatype != EVENT_DATATYPE {
            return Err(EventDatasetError::BadDatatype(meta.datatype));
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let mut lines = contents.lines();
        let header = split_row(lines.next().unwrap_or("")).ok_or(EventDatasetError::BadRow(0))?;
        let find = |column: &'static str| {
            header
                .iter()
                .position(|h| h == column)
                .ok_or(EventDatasetError::MissingColumn(column))
        };
        let name_idx = find(NAME_COLUMN)?;
        let start_idx = find(START_COLUMN)?;
        let stop_idx = find(STOP_COLUMN)?;

        let mut intervals = Vec::new();
        for (row, line) in lines.enumerate() {
            if line.is_empty() {
                continue;
            }
            let fields = split_row(line).ok_or(EventDatasetError::BadRow(row + 1))?;
            if fields.len() != header.len() {
                return Err(EventDatasetError::BadRow(row + 1));
            }
            intervals.push(StimulusInterval {
                name: fields[name_idx].clone(),
                start: fields[start_idx].parse()?,
                stop: fields[stop_idx].parse()?,
            });
        }
        Ok(intervals)
    }
}

/// Quote a CSV field if it contains a delimiter, quote or line break
fn quote_field(field: &str) -> String {
    if field.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        String::from(field)
    }
}

/// Split a single CSV row, honoring double quotes. Returns None on an unterminated quote
fn split_row(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if current.is_empty() => in_quotes = true,
            (',', false) => fields.push(std::mem::take(&mut current)),
            (c, _) => current.push(c),
        }
    }
    if in_quotes {
        return None;
    }
    fields.push(current);
    Some(fields)
}
