use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::{NormalizedDocument, Page};

/// Page counter printed in every page header; the numbers change per page.
static PAGE_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Page [0-9]+ of [0-9]+").unwrap());

/// Strip the repeating page header from every body page and join the pages
///
/// The header is everything on the first body page before the first `anchor`
/// occurrence, with its page counter generalized to match any page number.
/// Each page loses the header only when it leads the page (after optional
/// whitespace), then leading whitespace.
/// Pages are joined with `" \n"` and the result starts with a newline.
pub fn normalize(body: &[Page], anchor: &str) -> TranscriptResult<NormalizedDocument> {
    let first = body
        .first()
        .ok_or_else(|| TranscriptError::malformed("document has no transcript body pages"))?;

    let anchor_index = first.text.find(anchor).ok_or_else(|| {
        TranscriptError::malformed(format!(
            "anchor {:?} not found on first transcript page (page {})",
            anchor, first.number
        ))
    })?;

    let prefix = first.text[..anchor_index].trim_end();
    let pattern = build_prefix_pattern(prefix)?;
    debug!(
        "Boilerplate prefix {:?} ({} body pages)",
        prefix,
        body.len()
    );

    let fragments: Vec<String> = body
        .iter()
        .map(|page| strip_prefix(pattern.as_ref(), &page.text))
        .collect();

    let text = format!("\n{}", fragments.join(" \n"));

    Ok(NormalizedDocument {
        text,
        fragments,
        prefix: prefix.to_string(),
    })
}

/// Turn a literal header into a pattern that tolerates any page counter
///
/// The pattern only matches at the start of a page.
fn build_prefix_pattern(prefix: &str) -> TranscriptResult<Option<Regex>> {
    if prefix.is_empty() {
        return Ok(None);
    }

    let mut pattern = String::with_capacity(prefix.len() * 2 + 4);
    pattern.push_str(r"^\s*");
    let mut last = 0;
    for counter in PAGE_COUNTER.find_iter(prefix) {
        pattern.push_str(&regex::escape(&prefix[last..counter.start()]));
        pattern.push_str(PAGE_COUNTER.as_str());
        last = counter.end();
    }
    pattern.push_str(&regex::escape(&prefix[last..]));

    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| TranscriptError::malformed(format!("unusable page header: {}", e)))
}

fn strip_prefix(pattern: Option<&Regex>, text: &str) -> String {
    let stripped = match pattern {
        Some(re) => re.replacen(text, 1, NoExpand("")),
        None => Cow::Borrowed(text),
    };
    stripped.trim_start().to_string()
}
