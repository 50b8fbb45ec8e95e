//! JSON export of reviewed drafts

use std::fs;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DEFAULT_EXPORT_FILE;
use crate::domain::{ContentStatus, GeneratedContent, Platform};

/// One exported draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub platform: Platform,
    /// Displayed text: the edit when there is one, otherwise the original
    pub content: String,
    pub status: ContentStatus,
}

/// Build export records in item order
pub fn export_records(items: &[GeneratedContent]) -> Vec<ExportRecord> {
    debug!(count = items.len(), "export_records: called");
    items
        .iter()
        .map(|item| ExportRecord {
            platform: item.platform,
            content: item.displayed_content().to_string(),
            status: item.status,
        })
        .collect()
}

/// Pretty-printed JSON array with two-space indentation
pub fn export_json(records: &[ExportRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize export")
}

/// Resolve where an export goes: a directory gets the file name appended
pub fn export_path(target: &Path, file_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(file_name)
    } else {
        target.to_path_buf()
    }
}

/// Write records to `target` (a file, or a directory receiving `file_name`)
pub fn write_export(target: &Path, file_name: Option<&str>, records: &[ExportRecord]) -> Result<PathBuf> {
    let path = export_path(target, file_name.unwrap_or(DEFAULT_EXPORT_FILE));
    debug!(?path, count = records.len(), "write_export: called");

    let json = export_json(records)?;
    fs::write(&path, json).context(format!("Failed to write export to {}", path.display()))?;

    info!("Exported {} drafts to {}", records.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Sampler, SeededRandom, TemplateEngine, draft};
    use tempfile::tempdir;

    fn items() -> Vec<GeneratedContent> {
        let engine = TemplateEngine::embedded_only();
        let mut sampler = Sampler::new(Box::new(SeededRandom::new(11)), 0.85..0.97, 0..1);
        vec![
            draft(&engine, &mut sampler, Platform::Twitter, "Ship it").unwrap(),
            draft(&engine, &mut sampler, Platform::Blog, "Ship it").unwrap(),
        ]
    }

    #[test]
    fn test_export_uses_displayed_content() {
        let mut items = items();
        items[1].edit("my edit");
        items[0].approve();

        let records = export_records(&items);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].platform, Platform::Twitter);
        assert_eq!(records[0].content, items[0].content);
        assert_eq!(records[0].status, ContentStatus::Approved);
        assert_eq!(records[1].content, "my edit");
        assert_eq!(records[1].status, ContentStatus::Modified);
    }

    #[test]
    fn test_export_json_shape() {
        let mut items = items();
        for item in items.iter_mut() {
            item.approve();
        }
        let json = export_json(&export_records(&items)).unwrap();
        assert!(json.starts_with("[\n  {\n    \"platform\": \"twitter\""));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        for entry in array {
            let obj = entry.as_object().unwrap();
            assert_eq!(obj.len(), 3);
            assert_eq!(obj["status"], "approved");
        }
        assert_eq!(array[1]["platform"], "blog");
    }

    #[test]
    fn test_write_export_into_directory() {
        let temp = tempdir().unwrap();
        let path = write_export(temp.path(), None, &export_records(&items())).unwrap();
        assert_eq!(path, temp.path().join("content-export.json"));

        let parsed: Vec<ExportRecord> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].status, ContentStatus::Generating);
    }

    #[test]
    fn test_write_export_to_file() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("drafts.json");
        let path = write_export(&target, Some("ignored.json"), &[]).unwrap();
        assert_eq!(path, target);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
