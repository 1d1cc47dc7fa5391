use crate::models::{Turn, render_lines};

/// System prompt shared by every summary request
pub const SYSTEM_PROMPT: &str = r#"You are an equity research analyst reading an earnings call transcript.

Rules:
1. Use only information stated in the transcript. Do not add outside facts.
2. Quote figures exactly as spoken, with their units and periods.
3. If the transcript does not cover the topic, say so in one sentence.
4. Answer in concise plain text. Use short bullet points where a list is asked for.

Transcript lines are formatted as "<role>: <utterance>", where role is one of
Management, Question (an analyst) or Moderator."#;

/// Which part of the call a prompt covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portion {
    /// Prepared remarks before the first analyst question
    Management,
    /// The question-and-answer session
    Qna,
}

impl Portion {
    fn describe(&self) -> &'static str {
        match self {
            Portion::Management => "management's prepared remarks",
            Portion::Qna => "question-and-answer session",
        }
    }
}

/// Overall summary of the whole call
pub fn build_summary_prompt(turns: &[Turn]) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Task\n");
    prompt.push_str("Summarize this earnings call in one or two paragraphs. Cover business performance, ");
    prompt.push_str("key figures, strategic themes and the main concerns raised by analysts.\n\n");
    push_transcript(&mut prompt, "Full transcript", turns);
    prompt
}

/// Revenue and profit figures discussed in one portion of the call
pub fn build_revenue_profit_prompt(portion: Portion, turns: &[Turn]) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Task\n");
    prompt.push_str(&format!(
        "From the {}, list the revenue and profit highlights: reported figures, growth rates, ",
        portion.describe()
    ));
    prompt.push_str("margins and the drivers given for them.\n\n");
    push_transcript(&mut prompt, portion_title(portion), turns);
    prompt
}

/// Management's commentary on the business
pub fn build_management_commentary_prompt(turns: &[Turn]) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Task\n");
    prompt.push_str("Summarize management's commentary: how they describe the quarter, strategy, ");
    prompt.push_str("operating environment, risks and priorities.\n\n");
    push_transcript(&mut prompt, portion_title(Portion::Management), turns);
    prompt
}

/// Forward-looking guidance given in one portion of the call
pub fn build_guidance_outlook_prompt(portion: Portion, turns: &[Turn]) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Task\n");
    prompt.push_str(&format!(
        "From the {}, summarize the guidance and outlook: targets, expectations for coming ",
        portion.describe()
    ));
    prompt.push_str("quarters, planned investments and any caveats attached to them.\n\n");
    push_transcript(&mut prompt, portion_title(portion), turns);
    prompt
}

/// Key points raised and answered in the Q&A session
pub fn build_qna_key_points_prompt(turns: &[Turn]) -> String {
    let mut prompt = String::new();
    prompt.push_str("# Task\n");
    prompt.push_str("List the key points of the question-and-answer session. For each theme, give the ");
    prompt.push_str("analysts' concern and management's answer.\n\n");
    push_transcript(&mut prompt, portion_title(Portion::Qna), turns);
    prompt
}

fn portion_title(portion: Portion) -> &'static str {
    match portion {
        Portion::Management => "Management remarks",
        Portion::Qna => "Question and answer session",
    }
}

fn push_transcript(prompt: &mut String, title: &str, turns: &[Turn]) {
    prompt.push_str(&format!("## {}\n", title));
    prompt.push_str(&render_lines(turns));
    prompt.push('\n');
}
