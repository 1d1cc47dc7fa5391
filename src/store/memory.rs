use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::{TranscriptSummary, TranscriptTable, TurnRecord};
use crate::store::TranscriptStore;

type Key = (String, String);

/// In-process store, mainly for tests and one-shot CLI runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    turns: RwLock<HashMap<Key, BTreeMap<u32, TurnRecord>>>,
    summaries: RwLock<HashMap<Key, TranscriptSummary>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(entity: &str, period: &str) -> Key {
    (entity.to_string(), period.to_string())
}

fn poisoned<T>(_: T) -> TranscriptError {
    TranscriptError::Storage("store lock poisoned".to_string())
}

impl TranscriptStore for MemoryStore {
    fn load_table(&self, entity: &str, period: &str) -> TranscriptResult<Option<TranscriptTable>> {
        let turns = self.turns.read().map_err(poisoned)?;
        match turns.get(&key(entity, period)) {
            Some(records) if !records.is_empty() => {
                let records = records.values().cloned().collect();
                TranscriptTable::from_records(entity, period, records).map(Some)
            }
            _ => Ok(None),
        }
    }

    fn upsert_table(&self, table: &TranscriptTable) -> TranscriptResult<()> {
        let mut turns = self.turns.write().map_err(poisoned)?;
        let stored = turns.entry(key(&table.entity, &table.period)).or_default();
        for record in table.to_records() {
            stored.insert(record.turn_index, record);
        }
        Ok(())
    }

    fn load_summary(
        &self,
        entity: &str,
        period: &str,
    ) -> TranscriptResult<Option<TranscriptSummary>> {
        let summaries = self.summaries.read().map_err(poisoned)?;
        Ok(summaries.get(&key(entity, period)).cloned())
    }

    fn upsert_summary(&self, summary: &TranscriptSummary) -> TranscriptResult<()> {
        let mut summaries = self.summaries.write().map_err(poisoned)?;
        summaries.insert(key(&summary.entity, &summary.period), summary.clone());
        Ok(())
    }
}
