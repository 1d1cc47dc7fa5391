use tracing::{info, warn};

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::{LayoutConfig, Page, Role, TranscriptTable, Turn};
use crate::stages::{RoleClassifier, Roster, Segment, classify_segments, normalize, segment_document};

/// Number classified segments 1..=N in order and build the table
pub fn assemble(entity: &str, period: &str, classified: Vec<(Segment, Role)>) -> TranscriptTable {
    let turns: Vec<Turn> = classified
        .into_iter()
        .zip(1u32..)
        .map(|((segment, role), index)| Turn {
            index,
            speaker: segment.speaker,
            role,
            utterance: segment.utterance,
        })
        .collect();

    TranscriptTable::new(entity.to_string(), period.to_string(), turns)
}

/// Rebuild the speaker-turn table of one call from its extracted pages
///
/// The document must follow `layout`: a roster page, then the transcript body
/// from `layout.body_start_page` on. Nothing is returned on failure; a
/// successful table always has at least one turn.
pub fn reconstruct<C: RoleClassifier + ?Sized>(
    pages: &[Page],
    layout: &LayoutConfig,
    classifier: &C,
    entity: &str,
    period: &str,
) -> TranscriptResult<TranscriptTable> {
    if pages.len() < layout.min_pages() {
        return Err(TranscriptError::malformed(format!(
            "expected at least {} pages (cover, roster, transcript), found {}",
            layout.min_pages(),
            pages.len()
        )));
    }

    let roster = Roster::new(pages[layout.roster_page].text.as_str());
    let body = &pages[layout.body_start_page..];

    let document = normalize(body, &layout.anchor)?;
    let segments = segment_document(&document)?;
    let classified = classify_segments(segments, &roster, classifier);
    let table = assemble(entity, period, classified);

    let defects = table.defects().count();
    if defects > 0 {
        warn!(
            "{} {}: {} turns have an empty speaker label",
            entity, period, defects
        );
    }
    info!(
        "{} {}: reconstructed {} turns from {} transcript pages",
        entity,
        period,
        table.len(),
        document.page_count()
    );

    Ok(table)
}
