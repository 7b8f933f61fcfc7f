//! Instruction text sent to the model alongside the PDF.

pub const NO_MATCHES: &str = "No matches found.";

/// Renders keywords as `"a", "b"`.
pub fn quote_keywords(keywords: &[String]) -> String {
    keywords
        .iter()
        .map(|k| format!("\"{}\"", k))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Renders topics as `[a], [b]`.
pub fn bracket_topics(topics: &[String]) -> String {
    topics
        .iter()
        .map(|t| format!("[{}]", t))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn build_prompt(keywords: &[String], topics: &[String]) -> String {
    let mut search_terms = String::new();
    if !keywords.is_empty() {
        search_terms.push_str(&format!(
            "KEYWORDS (exact match, case-insensitive, whole words only): {}\n",
            quote_keywords(keywords)
        ));
    }
    if !topics.is_empty() {
        search_terms.push_str(&format!(
            "TOPICS (semantic match, the sentence must clearly discuss the topic): {}\n",
            bracket_topics(topics)
        ));
    }

    let mut tags = Vec::new();
    if !keywords.is_empty() {
        tags.push("[KEYWORD: <matched keyword>]");
    }
    if !topics.is_empty() {
        tags.push("[TOPIC: <matched topic>]");
    }
    let tag_options = tags.join(" or ");

    format!(
        r#"You are searching the attached PDF document for complete sentences that match the search terms below.

{search_terms}
INSTRUCTIONS:
1. Return every complete sentence that matches, each on its own line.
2. Format each line exactly as: [PDF Page X | Doc Page Y] {tag_options} Sentence text.
3. X is the page's position in the PDF file, starting at 1. Y is the page number printed on the page itself.
4. If a page has no printed page number, use [Page X] instead of [PDF Page X | Doc Page Y].
5. Use the match-type tag to say which search term the sentence matched. If it matches several, repeat the line once per term.
6. Preserve the original wording and punctuation. Do not summarise, paraphrase or translate.
7. Ignore partial matches and keyword fragments inside longer words.
8. List matches in page order and do not add headings, numbering or commentary.
9. If nothing matches, respond with exactly: {NO_MATCHES}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn includes_only_keyword_clause_when_no_topics() {
        let prompt = build_prompt(&strings(&["treaty", "signed"]), &[]);
        assert!(prompt.contains(r#"KEYWORDS (exact match, case-insensitive, whole words only): "treaty", "signed""#));
        assert!(!prompt.contains("TOPICS"));
        assert!(prompt.contains("[KEYWORD: <matched keyword>] Sentence text."));
        assert!(!prompt.contains("[TOPIC:"));
    }

    #[test]
    fn includes_only_topic_clause_when_no_keywords() {
        let prompt = build_prompt(&[], &strings(&["climate policy"]));
        assert!(prompt.contains("[climate policy]"));
        assert!(!prompt.contains("KEYWORDS"));
        assert!(prompt.contains("[TOPIC: <matched topic>] Sentence text."));
    }

    #[test]
    fn offers_both_tags_when_both_lists_given() {
        let prompt = build_prompt(&strings(&["war"]), &strings(&["diplomacy", "trade"]));
        assert!(prompt.contains(r#""war""#));
        assert!(prompt.contains("[diplomacy], [trade]"));
        assert!(prompt.contains("[KEYWORD: <matched keyword>] or [TOPIC: <matched topic>]"));
        assert!(prompt.ends_with(NO_MATCHES));
    }

    #[test]
    fn is_deterministic() {
        let keywords = strings(&["a", "b"]);
        assert_eq!(build_prompt(&keywords, &[]), build_prompt(&keywords, &[]));
    }

    #[test]
    fn interpolates_terms_verbatim() {
        assert_eq!(quote_keywords(&strings(&["C++", "naïve"])), r#""C++", "naïve""#);
        assert_eq!(bracket_topics(&strings(&["Cold War"])), "[Cold War]");
        assert_eq!(quote_keywords(&[]), "");
    }
}
