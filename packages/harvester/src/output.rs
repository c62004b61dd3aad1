//! JSON output of scraped records.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::{HarvesterError, Result};
use crate::types::{FieldResult, ProjectRecord};

/// One entry of the output array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    #[serde(rename = "Serial No.")]
    pub serial_no: usize,

    #[serde(rename = "Rera Regd. No")]
    pub registration_number: FieldResult,

    #[serde(rename = "Project Name")]
    pub project_name: FieldResult,

    #[serde(rename = "Promoter Name (Company Name)")]
    pub promoter_name: FieldResult,

    #[serde(rename = "Address of the Promoter (Registered Office Address)")]
    pub promoter_address: FieldResult,

    #[serde(rename = "GST No.")]
    pub gst_number: FieldResult,
}

impl OutputRecord {
    #[must_use]
    pub fn new(serial_no: usize, record: &ProjectRecord) -> Self {
        Self {
            serial_no,
            registration_number: record.registration_number.clone(),
            project_name: record.project_name.clone(),
            promoter_name: record.promoter_name.clone(),
            promoter_address: record.promoter_address.clone(),
            gst_number: record.gst_number.clone(),
        }
    }
}

/// Number the records from 1, in order.
#[must_use]
pub fn to_output_records(records: &[ProjectRecord]) -> Vec<OutputRecord> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| OutputRecord::new(i + 1, record))
        .collect()
}

/// Serialize records as a JSON array indented by 4 spaces.
///
/// Non-ASCII text is written as-is.
pub fn to_json_string(records: &[OutputRecord]) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;

    String::from_utf8(buf)
        .map_err(|e| HarvesterError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Save records as a JSON file.
///
/// Uses atomic write pattern: writes to temp file, syncs to disk, then renames.
/// Missing parent directories are created.
///
/// # Returns
/// Path to the saved file
pub fn save_json(records: &[OutputRecord], path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        HarvesterError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Output path has no file name: {}", path.display()),
        ))
    })?;

    let output_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir)?;
            dir.to_path_buf()
        }
        _ => PathBuf::from("."),
    };

    let temp_file = output_dir.join(format!(".{}.tmp", file_name.to_string_lossy()));
    let content = to_json_string(records)?;

    if let Err(e) = write_synced(&temp_file, &content).and_then(|()| replace(&temp_file, path)) {
        // Best effort; the original error is the one worth reporting
        let _ = fs::remove_file(&temp_file);
        return Err(e.into());
    }
    tracing::info!(path = %path.display(), records = records.len(), "Saved JSON");

    Ok(path.to_path_buf())
}

fn write_synced(path: &Path, content: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()
}

fn replace(from: &Path, to: &Path) -> io::Result<()> {
    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if to.is_file() {
        fs::remove_file(to)?;
    }

    fs::rename(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn sample_record() -> ProjectRecord {
        let mut record = ProjectRecord::not_found();
        record.project_name = FieldResult::Value("Sunrise Heights".to_string());
        record.registration_number = FieldResult::Value("RP/01/2024/00123".to_string());
        record.promoter_name = FieldResult::Value("Sunrise Builders Pvt Ltd".to_string());
        record.promoter_address = FieldResult::Placeholder;
        record
    }

    #[test]
    fn test_serial_numbers_start_at_one() {
        let records = vec![sample_record(), ProjectRecord::not_found()];
        let output = to_output_records(&records);

        assert_eq!(output.len(), 2);
        assert_eq!(output[0].serial_no, 1);
        assert_eq!(output[1].serial_no, 2);
        assert_eq!(output[1].project_name, FieldResult::NotFound);
    }

    #[test]
    fn test_json_layout() {
        let output = to_output_records(&[sample_record()]);
        let json = to_json_string(&output).unwrap();

        let expected = r#"[
    {
        "Serial No.": 1,
        "Rera Regd. No": "RP/01/2024/00123",
        "Project Name": "Sunrise Heights",
        "Promoter Name (Company Name)": "Sunrise Builders Pvt Ltd",
        "Address of the Promoter (Registered Office Address)": "Not Found (Placeholder '--' present)",
        "GST No.": "Not Found"
    }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_json_keeps_non_ascii() {
        let mut record = ProjectRecord::not_found();
        record.promoter_address = FieldResult::Value("ଭୁବନେଶ୍ୱର, Odisha".to_string());
        let json = to_json_string(&to_output_records(&[record])).unwrap();

        assert!(json.contains("ଭୁବନେଶ୍ୱର, Odisha"));
        assert!(!json.contains("\\u"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(to_json_string(&[]).unwrap(), "[]");
    }

    #[test]
    fn test_save_json_creates_parent() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("out").join("rera.json");
        let output = to_output_records(&[sample_record()]);

        let saved = save_json(&output, &path).unwrap();
        assert_eq!(saved, path);

        let content = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["Project Name"], "Sunrise Heights");
        assert!(!temp_dir.path().join("out").join(".rera.json.tmp").exists());
    }

    #[test]
    fn test_failed_save_removes_temp_file() {
        let temp_dir = tempdir().unwrap();
        // A non-empty directory where the file should go makes the rename fail
        let path = temp_dir.path().join("rera.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep.txt"), "x").unwrap();

        let result = save_json(&to_output_records(&[sample_record()]), &path);

        assert!(matches!(result, Err(HarvesterError::Io(_))));
        assert!(!temp_dir.path().join(".rera.json.tmp").exists());
        assert!(path.join("keep.txt").exists());
    }

    #[test]
    fn test_save_json_replaces_existing() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("rera.json");
        fs::write(&path, "stale").unwrap();

        save_json(&to_output_records(&[sample_record()]), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n    {"));
    }
}
