//! Normalises the model's free-text answer into the canonical line format
//! `[PDF Page X | Doc Page Y] [KEYWORD: term] Sentence.`
//!
//! Every rule rewrites towards an already-canonical form, so running the
//! whole chain a second time changes nothing.

use crate::prompt::NO_MATCHES;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

static CODE_FENCES: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*```[A-Za-z]*[ \t]*(?:\n|$)").unwrap());

static LIST_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*•]|\d+[.)])[ \t]+(\[)").unwrap());

static PAGE_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\[[ \t]*(?:(?:pdf[ \t]*)?page[ \t]*)?(\d+)[ \t]*\|[ \t]*(?:doc(?:ument)?[ \t]*page[ \t]*)?(\d+)[ \t]*\]",
    )
    .unwrap()
});

static SINGLE_PAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[[ \t]*page[ \t]*(\d+)[ \t]*\]").unwrap());

/// A match-type tag at the start of a line (after an optional list marker)
/// or directly after a page tag. Anywhere else it is part of the quote.
static MATCH_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(^[ \t]*(?:(?:[-*•]|\d+[.)])[ \t]+)?|\[(?:PDF Page \d+ \| Doc Page \d+|Page \d+)\][ \t]*)[\[(][ \t]*(keyword|topic)[ \t]*(?::[ \t]*([^\]\)\n]*?))?[ \t]*[\])]",
    )
    .unwrap()
});

static CANONICAL_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(?:PDF Page \d+ \| Doc Page \d+|Page \d+|KEYWORD(?:: [^\]\n]*)?|TOPIC(?:: [^\]\n]*)?)\][ \t]*")
        .unwrap()
});

static NO_MATCH_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bno[ \t]+matches[ \t]+(?:were[ \t]+)?found\b").unwrap());

static TRAILING_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

static PAGE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[(?:Page \d+|PDF Page \d+ \| Doc Page \d+)\]").unwrap());

pub fn reformat_response(raw: &str) -> String {
    let text = LINE_ENDINGS.replace_all(raw, "\n");
    let text = CODE_FENCES.replace_all(&text, "");
    let text = PAGE_PAIR.replace_all(&text, "[PDF Page ${1} | Doc Page ${2}]");
    let text = SINGLE_PAGE.replace_all(&text, "[Page ${1}]");
    let text = MATCH_TYPE.replace_all(&text, |caps: &Captures| {
        let lead = &caps[1];
        let kind = caps[2].to_ascii_uppercase();
        let term = caps
            .get(3)
            .map(|m| m.as_str().trim().trim_matches(|c: char| c == '"' || c == '\'').trim())
            .unwrap_or("");
        if term.is_empty() {
            format!("{lead}[{kind}]")
        } else {
            format!("{lead}[{kind}: {term}]")
        }
    });
    // After match-type normalisation, so `- (keyword: x)` loses its marker on the first pass.
    let text = LIST_MARKERS.replace_all(&text, "$1");
    let text = space_after_tags(&text);
    let text = canonicalise_no_match_lines(&text);
    let text = TRAILING_WHITESPACE.replace_all(&text, "");
    let text = BLANK_RUNS.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// One space between a tag and the text that follows it on the same line.
fn space_after_tags(text: &str) -> String {
    CANONICAL_TAG
        .replace_all(text, |caps: &Captures| {
            let whole = &caps[0];
            let tag = whole.trim_end_matches(|c: char| c == ' ' || c == '\t');
            let end = caps.get(0).map(|m| m.end()).unwrap_or(text.len());
            match text[end..].chars().next() {
                Some(c) if c != '\n' => format!("{tag} "),
                _ => tag.to_string(),
            }
        })
        .into_owned()
}

/// Lines that carry no tag and mention the no-match phrase become the
/// canonical phrase. Tagged lines are reported matches and stay as they are.
fn canonicalise_no_match_lines(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if NO_MATCH_PHRASE.is_match(line) && !CANONICAL_TAG.is_match(line) {
                NO_MATCHES
            } else {
                line
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of page tags in the text; one per reported match.
pub fn count_page_tags(text: &str) -> usize {
    PAGE_TAG.find_iter(text).count()
}
