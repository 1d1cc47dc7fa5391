use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::llm::{
    Portion, SYSTEM_PROMPT, TextGenerator, build_guidance_outlook_prompt,
    build_management_commentary_prompt, build_qna_key_points_prompt, build_revenue_profit_prompt,
    build_summary_prompt,
};
use crate::models::{TranscriptSummary, TranscriptTable, Turn};

/// Generate every summary for a reconstructed call
///
/// The management portion is every turn before the first analyst question;
/// the Q&A portion is that question and everything after it. A portion with
/// no turns is not sent to the generator and yields an empty string.
pub async fn summarize<G: TextGenerator>(
    generator: &G,
    table: &TranscriptTable,
) -> Result<TranscriptSummary> {
    let all = table.turns();
    let management = table.management_portion();
    let qna = table.qna_portion();

    info!(
        "Summarizing {} {}: {} management turns, {} Q&A turns",
        table.entity,
        table.period,
        management.len(),
        qna.len()
    );

    let summary = ask(generator, "summary", all, build_summary_prompt).await?;
    let revenue_profit_highlight_management = ask(
        generator,
        "management revenue/profit highlights",
        management,
        |t| build_revenue_profit_prompt(Portion::Management, t),
    )
    .await?;
    let revenue_profit_highlight_qna = ask(
        generator,
        "Q&A revenue/profit highlights",
        qna,
        |t| build_revenue_profit_prompt(Portion::Qna, t),
    )
    .await?;
    let management_commentary = ask(
        generator,
        "management commentary",
        management,
        build_management_commentary_prompt,
    )
    .await?;
    let guidance_outlook_management = ask(
        generator,
        "management guidance",
        management,
        |t| build_guidance_outlook_prompt(Portion::Management, t),
    )
    .await?;
    let guidance_outlook_qna = ask(
        generator,
        "Q&A guidance",
        qna,
        |t| build_guidance_outlook_prompt(Portion::Qna, t),
    )
    .await?;
    let qna_key_points = ask(generator, "Q&A key points", qna, build_qna_key_points_prompt).await?;

    Ok(TranscriptSummary {
        entity: table.entity.clone(),
        period: table.period.clone(),
        summary,
        revenue_profit_highlight_management,
        revenue_profit_highlight_qna,
        management_commentary,
        guidance_outlook_management,
        guidance_outlook_qna,
        qna_key_points,
        generated_at: Utc::now(),
    })
}

async fn ask<G, F>(generator: &G, what: &str, turns: &[Turn], build: F) -> Result<String>
where
    G: TextGenerator,
    F: FnOnce(&[Turn]) -> String,
{
    if turns.is_empty() {
        debug!("Skipping {}: no turns", what);
        return Ok(String::new());
    }

    let prompt = build(turns);
    debug!("Requesting {} ({} chars)", what, prompt.len());
    let response = generator
        .generate(SYSTEM_PROMPT, &prompt)
        .await
        .with_context(|| format!("Failed to generate {}", what))?;

    Ok(response.trim().to_string())
}
