use crate::error::{Result, SearchError};
use crate::models::SearchQuery;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

const MIB: f64 = 1024.0 * 1024.0;

/// Standard alphabet, padding optional.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Checks a raw request and turns it into a [`SearchQuery`].
///
/// The size limit applies to the decoded PDF bytes, not to the base64 text.
pub fn validate_query(
    pdf_data: Option<&str>,
    keywords: &[String],
    topics: &[String],
    max_pdf_bytes: usize,
) -> Result<SearchQuery> {
    let encoded = normalize_base64(pdf_data.unwrap_or_default());
    if encoded.is_empty() {
        return Err(SearchError::invalid_input("PDF data is required"));
    }

    let keywords = clean_terms(keywords);
    let topics = clean_terms(topics);
    if keywords.is_empty() && topics.is_empty() {
        return Err(SearchError::invalid_input("At least one keyword or topic is required"));
    }

    let declared_size = decoded_len(&encoded);
    if declared_size > max_pdf_bytes {
        return Err(too_large(declared_size, max_pdf_bytes));
    }

    let bytes = LENIENT_BASE64.decode(encoded.as_bytes()).map_err(|e| SearchError::InvalidInput {
        message: "PDF data must be base64 encoded".to_string(),
        details: Some(e.to_string()),
    })?;

    Ok(SearchQuery {
        pdf_base64: STANDARD.encode(&bytes),
        pdf_size_bytes: bytes.len(),
        keywords,
        topics,
    })
}

/// Drops a `data:...;base64,` prefix and any whitespace.
pub fn normalize_base64(raw: &str) -> String {
    let trimmed = raw.trim();
    let payload = match trimmed.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or(""),
        None => trimmed,
    };
    payload.chars().filter(|c| !c.is_ascii_whitespace()).collect()
}

/// Trims, drops blanks and exact duplicates, keeps the caller's order.
pub fn clean_terms(terms: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        let term = term.trim();
        if !term.is_empty() && !cleaned.iter().any(|t| t == term) {
            cleaned.push(term.to_string());
        }
    }
    cleaned
}

/// Byte length the base64 text decodes to, computed without decoding.
pub fn decoded_len(encoded: &str) -> usize {
    let unpadded = encoded.trim_end_matches('=').len();
    unpadded / 4 * 3 + (unpadded % 4).saturating_sub(1)
}

pub fn format_megabytes(bytes: usize) -> String {
    format!("{:.2}MB", bytes as f64 / MIB)
}

/// `2MB`, `1.50MB`, `512KB` under a megabyte, `100 bytes` under a kilobyte.
pub fn format_limit(limit: usize) -> String {
    let limit_mb = limit as f64 / MIB;
    if limit < 1024 {
        format!("{} bytes", limit)
    } else if limit_mb < 1.0 {
        format!("{}KB", limit / 1024)
    } else if limit_mb.fract() == 0.0 {
        format!("{}MB", limit_mb as u64)
    } else {
        format!("{:.2}MB", limit_mb)
    }
}

fn too_large(size: usize, limit: usize) -> SearchError {
    SearchError::InvalidInput {
        message: format!("PDF exceeds {} size limit", format_limit(limit)),
        details: Some(format!("actual size: {}", format_megabytes(size))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_PDF_BYTES;
    use crate::error::ErrorKind;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn message(err: SearchError) -> String {
        err.to_string()
    }

    #[test]
    fn accepts_a_small_pdf() {
        let encoded = STANDARD.encode(b"%PDF-1.4 tiny");
        let query = validate_query(Some(&encoded), &strings(&[" treaty "]), &[], DEFAULT_MAX_PDF_BYTES).unwrap();
        assert_eq!(query.pdf_base64, encoded);
        assert_eq!(query.pdf_size_bytes, 13);
        assert_eq!(query.keywords, strings(&["treaty"]));
        assert!(query.topics.is_empty());
    }

    #[test]
    fn requires_pdf_data() {
        let err = validate_query(None, &strings(&["a"]), &[], DEFAULT_MAX_PDF_BYTES).unwrap_err();
        assert_eq!(message(err), "PDF data is required");

        let err = validate_query(Some("  "), &strings(&["a"]), &[], DEFAULT_MAX_PDF_BYTES).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn requires_a_keyword_or_topic() {
        let err = validate_query(Some("JVBERi0="), &strings(&["", "  "]), &[], DEFAULT_MAX_PDF_BYTES).unwrap_err();
        assert_eq!(message(err), "At least one keyword or topic is required");

        let query = validate_query(Some("JVBERi0="), &[], &strings(&["trade"]), DEFAULT_MAX_PDF_BYTES).unwrap();
        assert_eq!(query.topics, strings(&["trade"]));
    }

    #[test]
    fn rejects_pdfs_over_the_decoded_limit() {
        let at_limit = STANDARD.encode(vec![0u8; 2 * 1024 * 1024]);
        assert!(validate_query(Some(&at_limit), &strings(&["a"]), &[], DEFAULT_MAX_PDF_BYTES).is_ok());

        let over = STANDARD.encode(vec![0u8; 2 * 1024 * 1024 + 1]);
        let err = validate_query(Some(&over), &strings(&["a"]), &[], DEFAULT_MAX_PDF_BYTES).unwrap_err();
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.details(), Some("actual size: 2.00MB"));
        assert_eq!(message(err), "PDF exceeds 2MB size limit");
    }

    #[test]
    fn rejects_malformed_base64() {
        let err = validate_query(Some("not*base64!"), &strings(&["a"]), &[], DEFAULT_MAX_PDF_BYTES).unwrap_err();
        assert_eq!(message(err), "PDF data must be base64 encoded");
    }

    #[test]
    fn tolerates_data_urls_whitespace_and_missing_padding() {
        let query = validate_query(
            Some("data:application/pdf;base64,JVBE\nRi0x"),
            &strings(&["a"]),
            &[],
            DEFAULT_MAX_PDF_BYTES,
        )
        .unwrap();
        assert_eq!(query.pdf_base64, "JVBERi0x");

        let query = validate_query(Some("JVBERi0"), &strings(&["a"]), &[], DEFAULT_MAX_PDF_BYTES).unwrap();
        assert_eq!(query.pdf_base64, "JVBERi0=");
        assert_eq!(query.pdf_size_bytes, 5);
    }

    #[test]
    fn decoded_len_matches_real_decoding() {
        for n in 0..10 {
            let encoded = STANDARD.encode(vec![7u8; n]);
            assert_eq!(decoded_len(&encoded), n);
            assert_eq!(decoded_len(encoded.trim_end_matches('=')), n);
        }
    }

    #[test]
    fn formats_limits() {
        assert_eq!(format_limit(2 * 1024 * 1024), "2MB");
        assert_eq!(format_limit(1024 * 1024 * 3 / 2), "1.50MB");
        assert_eq!(format_limit(1024), "1KB");
        assert_eq!(format_limit(100), "100 bytes");
    }

    #[test]
    fn tiny_limits_are_reported_in_bytes() {
        let encoded = STANDARD.encode(vec![0u8; 200]);
        let err = validate_query(Some(&encoded), &strings(&["a"]), &[], 100).unwrap_err();
        assert_eq!(message(err), "PDF exceeds 100 bytes size limit");
    }

    #[test]
    fn clean_terms_dedupes_in_order() {
        assert_eq!(clean_terms(&strings(&["b", " a", "b ", ""])), strings(&["b", "a"]));
    }
}
