use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::{TranscriptSummary, TranscriptTable, TurnRecord};
use crate::store::TranscriptStore;

/// Directory of JSON files, one turns file and one summary file per key
///
/// Files are replaced atomically, so a reader never sees a torn write and two
/// racing writers for the same key both succeed.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn turns_path(&self, entity: &str, period: &str) -> PathBuf {
        self.root
            .join(format!("{}.turns.json", file_stem(entity, period)))
    }

    fn summary_path(&self, entity: &str, period: &str) -> PathBuf {
        self.root
            .join(format!("{}.summary.json", file_stem(entity, period)))
    }
}

/// Filesystem-safe name for an (entity, period) key
fn file_stem(entity: &str, period: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!("{}__{}", clean(entity), clean(period))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> TranscriptResult<Option<T>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> TranscriptResult<()> {
    let parent = path
        .parent()
        .ok_or_else(|| TranscriptError::Storage(format!("no parent dir for {:?}", path)))?;
    fs::create_dir_all(parent)?;

    let data = serde_json::to_vec_pretty(value)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(&data)?;
    tmp.flush()?;
    tmp.persist(path)
        .map_err(|e| TranscriptError::Storage(format!("failed to replace {:?}: {}", path, e)))?;
    Ok(())
}

impl TranscriptStore for JsonStore {
    fn load_table(&self, entity: &str, period: &str) -> TranscriptResult<Option<TranscriptTable>> {
        let records: Option<Vec<TurnRecord>> = read_json(&self.turns_path(entity, period))?;
        match records {
            Some(records) if !records.is_empty() => {
                TranscriptTable::from_records(entity, period, records).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn upsert_table(&self, table: &TranscriptTable) -> TranscriptResult<()> {
        let path = self.turns_path(&table.entity, &table.period);

        let existing: Vec<TurnRecord> = read_json(&path)?.unwrap_or_default();
        let mut merged: BTreeMap<u32, TurnRecord> = existing
            .into_iter()
            .map(|r| (r.turn_index, r))
            .collect();
        for record in table.to_records() {
            merged.insert(record.turn_index, record);
        }

        let records: Vec<TurnRecord> = merged.into_values().collect();
        write_json_atomic(&path, &records)?;
        debug!("Stored {} turn records at {:?}", records.len(), path);
        Ok(())
    }

    fn load_summary(
        &self,
        entity: &str,
        period: &str,
    ) -> TranscriptResult<Option<TranscriptSummary>> {
        read_json(&self.summary_path(entity, period))
    }

    fn upsert_summary(&self, summary: &TranscriptSummary) -> TranscriptResult<()> {
        let path = self.summary_path(&summary.entity, &summary.period);
        write_json_atomic(&path, summary)?;
        debug!("Stored summary at {:?}", path);
        Ok(())
    }
}
