use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generated summaries for one call transcript, keyed by (entity, period)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSummary {
    pub entity: String,
    pub period: String,
    /// Overall call summary
    pub summary: String,
    pub revenue_profit_highlight_management: String,
    pub revenue_profit_highlight_qna: String,
    pub management_commentary: String,
    pub guidance_outlook_management: String,
    pub guidance_outlook_qna: String,
    pub qna_key_points: String,
    pub generated_at: DateTime<Utc>,
}
