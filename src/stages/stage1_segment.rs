use std::mem;

use tracing::{debug, warn};

use crate::error::{TranscriptError, TranscriptResult};
use crate::models::NormalizedDocument;

/// A speaker label paired with what they said, before role assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub speaker: String,
    pub utterance: String,
}

/// Lexical pieces of the document text relevant to turn splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentToken<'a> {
    /// Plain text between the other tokens
    Text(&'a str),
    /// A colon right after a digit, or a digit and one space (`9:30`, `3 :1`)
    ///
    /// The text is kept verbatim: `10 :15` stays `10 :15` and is not
    /// collapsed to `10:15`.
    DigitColon(&'a str),
    /// A colon ending a speaker label
    DelimiterColon,
    /// `"? "`, `". "` or a newline
    SentenceBoundary(&'a str),
}

/// Split text into segmentation tokens
pub fn tokenize(text: &str) -> Vec<SegmentToken<'_>> {
    let mut tokens = Vec::new();
    let mut run_start = 0;
    // The two characters before the current one, oldest first
    let mut prev: [Option<char>; 2] = [None, None];
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let len = match c {
            ':' | '\n' => 1,
            '?' | '.' if matches!(chars.peek(), Some((_, ' '))) => 2,
            _ => 0,
        };

        if len == 0 {
            prev = [prev[1], Some(c)];
            continue;
        }

        if run_start < i {
            tokens.push(SegmentToken::Text(&text[run_start..i]));
        }

        let token = match c {
            ':' if follows_digit(prev) => SegmentToken::DigitColon(&text[i..i + 1]),
            ':' => SegmentToken::DelimiterColon,
            _ => SegmentToken::SentenceBoundary(&text[i..i + len]),
        };
        tokens.push(token);

        if len == 2 {
            chars.next();
            prev = [Some(c), Some(' ')];
        } else {
            prev = [prev[1], Some(c)];
        }
        run_start = i + len;
    }

    if run_start < text.len() {
        tokens.push(SegmentToken::Text(&text[run_start..]));
    }

    tokens
}

fn follows_digit(prev: [Option<char>; 2]) -> bool {
    match prev {
        [_, Some(d)] if d.is_ascii_digit() => true,
        [Some(d), Some(' ')] if d.is_ascii_digit() => true,
        _ => false,
    }
}

#[derive(Debug)]
enum State {
    /// Still in the prologue before the first speaker label
    AwaitingSpeaker,
    /// Collecting the utterance of `speaker`
    InUtterance { speaker: String },
}

/// Turn splitter driven by [`SegmentToken`]s
///
/// Between two delimiter colons, text up to and including the last sentence
/// boundary belongs to the current utterance and everything after it is the
/// next speaker's label. A label that itself contains `". "`, `"? "` or a
/// newline is therefore cut at that boundary.
#[derive(Debug)]
struct Segmenter {
    state: State,
    /// Text up to the last sentence boundary since the previous delimiter
    tail: String,
    /// Text after that boundary; becomes a speaker label on the next delimiter
    label: String,
    segments: Vec<Segment>,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            state: State::AwaitingSpeaker,
            tail: String::new(),
            label: String::new(),
            segments: Vec::new(),
        }
    }

    fn feed(&mut self, token: SegmentToken<'_>) {
        match token {
            SegmentToken::Text(s) | SegmentToken::DigitColon(s) => self.label.push_str(s),
            SegmentToken::SentenceBoundary(s) => {
                self.tail.push_str(&self.label);
                self.tail.push_str(s);
                self.label.clear();
            }
            SegmentToken::DelimiterColon => {
                let utterance = mem::take(&mut self.tail);
                let next_speaker = mem::take(&mut self.label);
                match mem::replace(&mut self.state, State::AwaitingSpeaker) {
                    State::AwaitingSpeaker => {
                        if !utterance.trim().is_empty() {
                            debug!("Dropping {} chars of prologue", utterance.len());
                        }
                    }
                    State::InUtterance { speaker } => self.emit(speaker, &utterance),
                }
                self.state = State::InUtterance {
                    speaker: next_speaker,
                };
            }
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        let mut last = mem::take(&mut self.tail);
        last.push_str(&self.label);

        if let State::InUtterance { speaker } = mem::replace(&mut self.state, State::AwaitingSpeaker) {
            if last.trim().is_empty() {
                debug!("Discarding trailing speaker label {:?} with no utterance", speaker.trim());
            } else {
                self.emit(speaker, &last);
            }
        }

        self.segments
    }

    fn emit(&mut self, speaker: String, utterance: &str) {
        let speaker = speaker.trim().to_string();
        if speaker.is_empty() {
            warn!(
                "Empty speaker label before turn {} ({:?})",
                self.segments.len() + 1,
                truncate(utterance.trim(), 60)
            );
        }
        self.segments.push(Segment {
            speaker,
            utterance: utterance.trim().to_string(),
        });
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Split document text into (speaker, utterance) pairs in source order
pub fn segment(text: &str) -> Vec<Segment> {
    let mut segmenter = Segmenter::new();
    for token in tokenize(text) {
        segmenter.feed(token);
    }
    segmenter.finish()
}

/// Segment a normalized document, rejecting one with no turn structure
pub fn segment_document(doc: &NormalizedDocument) -> TranscriptResult<Vec<Segment>> {
    let segments = segment(&doc.text);
    if segments.is_empty() {
        return Err(TranscriptError::malformed(
            "no colon-delimited speaker turns found in transcript body",
        ));
    }
    debug!("Segmented {} turns", segments.len());
    Ok(segments)
}
