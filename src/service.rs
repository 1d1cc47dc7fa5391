use anyhow::{Context, Result};
use tracing::info;

use crate::error::TranscriptResult;
use crate::io::{DocumentLocator, DocumentReader};
use crate::llm::TextGenerator;
use crate::models::{LayoutConfig, TranscriptSummary, TranscriptTable};
use crate::stages::{RoleClassifier, reconstruct, summarize};
use crate::store::TranscriptStore;

/// Serves transcripts and summaries per (entity, period), building each once
///
/// A stored table is returned as-is and the document is never read again for
/// that key.
pub struct TranscriptService<S, R, C> {
    pub store: S,
    pub reader: R,
    pub locator: DocumentLocator,
    pub classifier: C,
    pub layout: LayoutConfig,
}

/// Canonical form of an entity identifier
pub fn normalize_entity(entity: &str) -> String {
    entity.trim().to_uppercase()
}

impl<S, R, C> TranscriptService<S, R, C>
where
    S: TranscriptStore,
    R: DocumentReader,
    C: RoleClassifier,
{
    pub fn new(store: S, reader: R, locator: DocumentLocator, classifier: C) -> Self {
        Self {
            store,
            reader,
            locator,
            classifier,
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    /// Stored table for the key, or reconstruct it from its document and store it
    pub fn transcript(&self, entity: &str, period: &str) -> TranscriptResult<TranscriptTable> {
        let entity = normalize_entity(entity);

        if let Some(table) = self.store.load_table(&entity, period)? {
            info!("{} {}: using stored transcript ({} turns)", entity, period, table.len());
            return Ok(table);
        }

        let path = self.locator.resolve(&entity, period);
        info!("{} {}: reconstructing from {:?}", entity, period, path);
        let pages = self.reader.read_pages(&path)?;
        let table = reconstruct(&pages, &self.layout, &self.classifier, &entity, period)?;

        self.store.upsert_table(&table)?;
        Ok(table)
    }

    /// Stored summary for the key, or generate one and store it
    pub async fn summary<G: TextGenerator>(
        &self,
        entity: &str,
        period: &str,
        generator: &G,
    ) -> Result<TranscriptSummary> {
        let entity = normalize_entity(entity);

        if let Some(summary) = self.store.load_summary(&entity, period)? {
            info!("{} {}: using stored summary", entity, period);
            return Ok(summary);
        }

        let table = self
            .transcript(&entity, period)
            .with_context(|| format!("Failed to load transcript for {} {}", entity, period))?;
        let summary = summarize(generator, &table).await?;

        self.store.upsert_summary(&summary)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use super::*;
    use crate::error::TranscriptError;
    use crate::models::{Page, Role, pages_from_texts};
    use crate::stages::RosterSubstringClassifier;
    use crate::store::MemoryStore;

    /// Serves fixed pages for one path and counts reads
    struct FixtureReader {
        path: std::path::PathBuf,
        pages: Vec<Page>,
        reads: Mutex<usize>,
    }

    impl DocumentReader for FixtureReader {
        fn read_pages(&self, path: &Path) -> TranscriptResult<Vec<Page>> {
            *self.reads.lock().unwrap() += 1;
            if path == self.path.as_path() {
                Ok(self.pages.clone())
            } else {
                Err(TranscriptError::not_found(path, "no such file"))
            }
        }
    }

    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        async fn generate(&self, _system: &str, prompt: &str) -> Result<String> {
            Ok(format!("{} chars", prompt.len()))
        }
    }

    fn reader(path: &str, texts: &[&str]) -> FixtureReader {
        FixtureReader {
            path: path.into(),
            pages: pages_from_texts(texts.iter().copied()),
            reads: Mutex::new(0),
        }
    }

    fn service() -> TranscriptService<MemoryStore, FixtureReader, RosterSubstringClassifier> {
        let reader = reader(
            "pdfs/titan_2025Q1.pdf",
            &[
                "Titan Company Q1 FY26 Earnings Conference Call",
                "Management: C. K. Venkataraman - MD, Ashok Sonthalia - CFO",
                "Page 1 of 2 Titan Company Limited\nModerator: Welcome. Ashok Sonthalia: Income grew 20%. Moderator: First question. Analyst One: Margins? Ashok Sonthalia: Stable.",
                "Page 2 of 2 Titan Company Limited\n",
            ],
        );
        TranscriptService::new(
            MemoryStore::new(),
            reader,
            DocumentLocator::new("pdfs"),
            RosterSubstringClassifier,
        )
    }

    #[test]
    fn test_transcript_is_built_once() {
        let service = service();

        let first = service.transcript(" titan.ns ", "2025Q1").unwrap();
        let second = service.transcript("TITAN.NS", "2025Q1").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.entity, "TITAN.NS");
        assert_eq!(first.len(), 5);
        assert_eq!(*service.reader.reads.lock().unwrap(), 1);
    }

    #[test]
    fn test_custom_layout_without_cover_page() {
        let texts = [
            "Jane Doe - CEO",
            "ACME Call\nModerator: Welcome. Jane Doe: Growth was strong. Raj: Why?",
        ];
        let service = TranscriptService::new(
            MemoryStore::new(),
            reader("pdfs/acme_2025Q1.pdf", &texts),
            DocumentLocator::new("pdfs"),
            RosterSubstringClassifier,
        );
        assert!(service.transcript("ACME", "2025Q1").unwrap_err().is_malformed());

        let service = TranscriptService::new(
            MemoryStore::new(),
            reader("pdfs/acme_2025Q1.pdf", &texts),
            DocumentLocator::new("pdfs"),
            RosterSubstringClassifier,
        )
        .with_layout(LayoutConfig {
            roster_page: 0,
            body_start_page: 1,
            ..LayoutConfig::default()
        });
        let table = service.transcript("ACME", "2025Q1").unwrap();

        let roles: Vec<Role> = table.turns().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::Moderator, Role::Management, Role::Question]);
    }

    #[test]
    fn test_missing_document_is_not_found() {
        let service = service();
        let err = service.transcript("TITAN.NS", "2024Q4").unwrap_err();
        assert!(err.is_not_found());
        assert!(service.store.load_table("TITAN.NS", "2024Q4").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_summary_is_cached() {
        let service = service();

        let first = service.summary("TITAN.NS", "2025Q1", &EchoGenerator).await.unwrap();
        let second = service.summary("TITAN.NS", "2025Q1", &EchoGenerator).await.unwrap();

        assert_eq!(first, second);
        assert!(!first.qna_key_points.is_empty());
        assert!(service.store.load_table("TITAN.NS", "2025Q1").unwrap().is_some());
    }
}
