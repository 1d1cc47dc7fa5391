use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TranscriptError, TranscriptResult};

/// Literal speaker label every moderator turn is rewritten to
pub const MODERATOR_LABEL: &str = "Moderator";

/// Who is speaking in a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Management,
    Question,
    Moderator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Management => "Management",
            Role::Question => "Question",
            Role::Moderator => "Moderator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reconstructed utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// 1-based position in the transcript
    pub index: u32,
    pub speaker: String,
    pub role: Role,
    pub utterance: String,
}

impl Turn {
    /// An empty speaker label means segmentation went wrong for this turn
    pub fn is_defective(&self) -> bool {
        self.speaker.trim().is_empty()
    }
}

/// Flat storage form of a turn, keyed by (entity, period, turn_index)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub entity: String,
    pub period: String,
    pub turn_index: u32,
    pub speaker: String,
    pub role: Role,
    pub utterance: String,
}

/// Ordered turns of one call transcript
///
/// Indices are always the dense run 1..=N in source order. The table is only
/// built by the assembler or rebuilt from stored records, and is never
/// reordered afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptTable {
    pub entity: String,
    pub period: String,
    turns: Vec<Turn>,
}

impl TranscriptTable {
    pub(crate) fn new(entity: String, period: String, turns: Vec<Turn>) -> Self {
        Self {
            entity,
            period,
            turns,
        }
    }

    /// Rebuild a table from stored records
    ///
    /// Records may arrive in any order; they must cover 1..=N exactly once.
    pub fn from_records(
        entity: &str,
        period: &str,
        mut records: Vec<TurnRecord>,
    ) -> TranscriptResult<Self> {
        if records.is_empty() {
            return Err(TranscriptError::Storage(format!(
                "no turn records for {} {}",
                entity, period
            )));
        }

        records.sort_by_key(|r| r.turn_index);

        let mut turns = Vec::with_capacity(records.len());
        for (position, record) in records.into_iter().enumerate() {
            let expected = position as u32 + 1;
            if record.entity != entity || record.period != period {
                return Err(TranscriptError::Storage(format!(
                    "record for {} {} found under {} {}",
                    record.entity, record.period, entity, period
                )));
            }
            if record.turn_index != expected {
                return Err(TranscriptError::Storage(format!(
                    "turn indices for {} {} are not contiguous: expected {}, found {}",
                    entity, period, expected, record.turn_index
                )));
            }
            turns.push(Turn {
                index: record.turn_index,
                speaker: record.speaker,
                role: record.role,
                utterance: record.utterance,
            });
        }

        Ok(Self::new(entity.to_string(), period.to_string(), turns))
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Get a turn by its 1-based index
    pub fn get(&self, index: u32) -> Option<&Turn> {
        let position = (index as usize).checked_sub(1)?;
        self.turns.get(position)
    }

    /// Index of the first analyst question, which opens the Q&A session
    pub fn first_question_index(&self) -> Option<u32> {
        self.turns
            .iter()
            .find(|t| t.role == Role::Question)
            .map(|t| t.index)
    }

    /// Turns before the first question (prepared remarks)
    pub fn management_portion(&self) -> &[Turn] {
        match self.first_question_position() {
            Some(position) => &self.turns[..position],
            None => &self.turns,
        }
    }

    /// Turns from the first question to the end
    pub fn qna_portion(&self) -> &[Turn] {
        match self.first_question_position() {
            Some(position) => &self.turns[position..],
            None => &[],
        }
    }

    /// Turns whose speaker label came out empty
    pub fn defects(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_defective())
    }

    pub fn to_records(&self) -> Vec<TurnRecord> {
        self.turns
            .iter()
            .map(|t| TurnRecord {
                entity: self.entity.clone(),
                period: self.period.clone(),
                turn_index: t.index,
                speaker: t.speaker.clone(),
                role: t.role,
                utterance: t.utterance.clone(),
            })
            .collect()
    }

    fn first_question_position(&self) -> Option<usize> {
        self.turns.iter().position(|t| t.role == Role::Question)
    }
}

/// Render turns as `<role>: <utterance>` lines for prompting
pub fn render_lines(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.utterance))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(index: u32, speaker: &str, role: Role, utterance: &str) -> Turn {
        Turn {
            index,
            speaker: speaker.to_string(),
            role,
            utterance: utterance.to_string(),
        }
    }

    fn sample_table() -> TranscriptTable {
        TranscriptTable::new(
            "ACME".to_string(),
            "2025Q1".to_string(),
            vec![
                turn(1, "Moderator", Role::Moderator, "Welcome."),
                turn(2, "Jane Doe", Role::Management, "Revenue grew 12%."),
                turn(3, "Moderator", Role::Moderator, "First question."),
                turn(4, "Raj Patel", Role::Question, "What about margins?"),
                turn(5, "Jane Doe", Role::Management, "Margins held."),
            ],
        )
    }

    #[test]
    fn test_portions_split_at_first_question() {
        let table = sample_table();
        assert_eq!(table.first_question_index(), Some(4));

        let management: Vec<u32> = table.management_portion().iter().map(|t| t.index).collect();
        let qna: Vec<u32> = table.qna_portion().iter().map(|t| t.index).collect();
        assert_eq!(management, vec![1, 2, 3]);
        assert_eq!(qna, vec![4, 5]);
    }

    #[test]
    fn test_no_question_means_empty_qna() {
        let table = TranscriptTable::new(
            "ACME".to_string(),
            "2025Q1".to_string(),
            vec![turn(1, "Moderator", Role::Moderator, "Welcome.")],
        );
        assert_eq!(table.first_question_index(), None);
        assert_eq!(table.management_portion().len(), 1);
        assert!(table.qna_portion().is_empty());
    }

    #[test]
    fn test_render_lines() {
        let table = sample_table();
        assert_eq!(
            render_lines(table.qna_portion()),
            "Question: What about margins?\nManagement: Margins held."
        );
    }

    #[test]
    fn test_records_round_trip_out_of_order() {
        let table = sample_table();
        let mut records = table.to_records();
        records.reverse();

        let rebuilt = TranscriptTable::from_records("ACME", "2025Q1", records).unwrap();
        assert_eq!(rebuilt, table);
    }

    #[test]
    fn test_from_records_rejects_gaps() {
        let table = sample_table();
        let mut records = table.to_records();
        records.remove(2);

        let err = TranscriptTable::from_records("ACME", "2025Q1", records).unwrap_err();
        assert!(matches!(err, TranscriptError::Storage(_)));
    }

    #[test]
    fn test_get_is_one_based() {
        let table = sample_table();
        assert_eq!(table.get(1).map(|t| t.utterance.as_str()), Some("Welcome."));
        assert!(table.get(0).is_none());
        assert!(table.get(6).is_none());
    }

    #[test]
    fn test_defective_turn_detection() {
        let table = TranscriptTable::new(
            "ACME".to_string(),
            "2025Q1".to_string(),
            vec![
                turn(1, "Moderator", Role::Moderator, "Welcome."),
                turn(2, "  ", Role::Management, "orphan text"),
            ],
        );
        let defects: Vec<u32> = table.defects().map(|t| t.index).collect();
        assert_eq!(defects, vec![2]);
    }
}
