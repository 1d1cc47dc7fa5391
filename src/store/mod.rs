pub mod json;
pub mod memory;

pub use json::*;
pub use memory::*;

use crate::error::TranscriptResult;
use crate::models::{TranscriptSummary, TranscriptTable};

/// Persistence for reconstructed transcripts and their summaries
///
/// Turn writes are upserts keyed by (entity, period, turn_index): writing the
/// same table twice, or two racing writers for one key, never fails on an
/// existing key. Summaries are upserted per (entity, period).
pub trait TranscriptStore {
    /// The stored table for a key, if one has been written
    fn load_table(&self, entity: &str, period: &str) -> TranscriptResult<Option<TranscriptTable>>;

    fn upsert_table(&self, table: &TranscriptTable) -> TranscriptResult<()>;

    fn load_summary(&self, entity: &str, period: &str)
    -> TranscriptResult<Option<TranscriptSummary>>;

    fn upsert_summary(&self, summary: &TranscriptSummary) -> TranscriptResult<()>;
}
