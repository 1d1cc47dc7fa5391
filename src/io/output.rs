use std::io::Write;
use std::mem;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Role, TranscriptSummary, TranscriptTable};

/// Column limit for utterances in the human-readable transcript
const WRAP_WIDTH: usize = 80;

/// Machine-readable transcript with per-role counts
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptExport<'a> {
    #[serde(flatten)]
    pub table: &'a TranscriptTable,
    pub metadata: TranscriptMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranscriptMetadata {
    pub total_turns: usize,
    pub management_turns: usize,
    pub question_turns: usize,
    pub moderator_turns: usize,
    pub first_question_index: Option<u32>,
    pub defective_turns: usize,
}

impl TranscriptMetadata {
    pub fn from_table(table: &TranscriptTable) -> Self {
        let count = |role: Role| table.turns().iter().filter(|t| t.role == role).count();
        Self {
            total_turns: table.len(),
            management_turns: count(Role::Management),
            question_turns: count(Role::Question),
            moderator_turns: count(Role::Moderator),
            first_question_index: table.first_question_index(),
            defective_turns: table.defects().count(),
        }
    }
}

/// Write a transcript table to a JSON file
pub fn write_table_json(table: &TranscriptTable, path: &Path) -> Result<()> {
    let export = TranscriptExport {
        table,
        metadata: TranscriptMetadata::from_table(table),
    };
    write_json(&export, path)
}

/// Write generated summaries to a JSON file
pub fn write_summary_json(summary: &TranscriptSummary, path: &Path) -> Result<()> {
    write_json(summary, path)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, value).context("Failed to write JSON")?;
    Ok(())
}

/// Human-readable transcript format
pub struct HumanTranscript<'a> {
    table: &'a TranscriptTable,
}

impl<'a> HumanTranscript<'a> {
    pub fn new(table: &'a TranscriptTable) -> Self {
        Self { table }
    }

    /// Format the transcript as human-readable text
    pub fn format(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "{} {} earnings call\n\n",
            self.table.entity, self.table.period
        ));

        let qna_start = self.table.first_question_index();
        for turn in self.table.turns() {
            if Some(turn.index) == qna_start {
                output.push_str("--- Question and answer session ---\n\n");
            }

            let speaker = if turn.is_defective() {
                "<unknown speaker>"
            } else {
                turn.speaker.as_str()
            };
            output.push_str(&format!("[{}] {} ({}):\n", turn.index, speaker, turn.role));
            output.push_str(&wrap_text(&turn.utterance, WRAP_WIDTH));
            output.push_str("\n\n");
        }

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Greedy word wrap; a single word longer than `width` gets its own line
fn wrap_text(text: &str, width: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    let mut line_chars = 0;

    for word in text.split_whitespace() {
        let word_chars = word.chars().count();
        if line_chars > 0 && line_chars + 1 + word_chars > width {
            lines.push(mem::take(&mut line));
            line_chars = 0;
        }
        if line_chars > 0 {
            line.push(' ');
            line_chars += 1;
        }
        line.push_str(word);
        line_chars += word_chars;
    }
    if !line.is_empty() {
        lines.push(line);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LayoutConfig, pages_from_texts};
    use crate::stages::{RosterSubstringClassifier, reconstruct};

    fn table() -> TranscriptTable {
        let pages = pages_from_texts([
            "Cover",
            "Jane Doe - CEO",
            "Header\nModerator: Welcome. Jane Doe: Revenue grew. Raj Patel: Why? Jane Doe: Demand.",
        ]);
        reconstruct(
            &pages,
            &LayoutConfig::default(),
            &RosterSubstringClassifier,
            "ACME",
            "2025Q1",
        )
        .unwrap()
    }

    #[test]
    fn test_long_utterance_wraps_at_eighty_columns() {
        let utterance = "Revenue for the quarter rose twelve percent on the back of strong retail demand, \
            while operating margins held near twenty one percent despite higher input costs and \
            a weaker rupee, and we expect similar momentum through the festive season";
        let pages = pages_from_texts([
            "Cover".to_string(),
            "Jane Doe - CEO".to_string(),
            format!("Header\nModerator: Welcome. Jane Doe: {}", utterance),
        ]);
        let table = reconstruct(
            &pages,
            &LayoutConfig::default(),
            &RosterSubstringClassifier,
            "ACME",
            "2025Q1",
        )
        .unwrap();

        let formatted = HumanTranscript::new(&table).format();
        let start = formatted.find("[2] Jane Doe (Management):\n").unwrap();
        let block = formatted[start..].lines().skip(1).take_while(|l| !l.is_empty());
        let lines: Vec<&str> = block.collect();

        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= WRAP_WIDTH));
        assert_eq!(lines.join(" "), table.turns()[1].utterance);
    }

    #[test]
    fn test_human_format_marks_qna() {
        let formatted = HumanTranscript::new(&table()).format();

        assert!(formatted.starts_with("ACME 2025Q1 earnings call\n\n"));
        assert!(formatted.contains("[1] Moderator (Moderator):\nWelcome.\n\n"));
        assert!(formatted.contains(
            "--- Question and answer session ---\n\n[3] Raj Patel (Question):\nWhy?\n\n"
        ));
    }

    #[test]
    fn test_metadata_counts() {
        let metadata = TranscriptMetadata::from_table(&table());
        assert_eq!(metadata.total_turns, 4);
        assert_eq!(metadata.management_turns, 2);
        assert_eq!(metadata.question_turns, 1);
        assert_eq!(metadata.moderator_turns, 1);
        assert_eq!(metadata.first_question_index, Some(3));
        assert_eq!(metadata.defective_turns, 0);
    }

    #[test]
    fn test_write_table_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_table_json(&table(), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["entity"], "ACME");
        assert_eq!(value["turns"][1]["speaker"], "Jane Doe");
        assert_eq!(value["turns"][1]["role"], "Management");
        assert_eq!(value["metadata"]["first_question_index"], 3);
    }
}
