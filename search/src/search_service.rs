use crate::error::{Result, SearchError};
use crate::gemini_service::GeminiService;
use crate::models::*;
use crate::post_processor::{count_page_tags, reformat_response};
use crate::prompt::build_prompt;
use std::sync::Arc;

pub struct SearchService {
    gemini_service: Arc<GeminiService>,
}

impl SearchService {
    pub fn new(gemini_service: Arc<GeminiService>) -> Self {
        Self { gemini_service }
    }

    pub fn is_configured(&self) -> bool {
        self.gemini_service.is_configured()
    }

    /// Prompt, one model call, then cleanup of the answer.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let start_time = std::time::Instant::now();

        let prompt = build_prompt(&query.keywords, &query.topics);
        let raw_answer = self
            .gemini_service
            .generate_content(&prompt, &query.pdf_base64)
            .await?;

        let text = reformat_response(&raw_answer);
        if text.is_empty() {
            return Err(SearchError::EmptyResponse);
        }

        let pages_analyzed = count_page_tags(&text);
        let processing_time = start_time.elapsed().as_millis();

        log::info!(
            "Model {} answered with {} chars, {} page tags in {}ms",
            self.gemini_service.model(),
            text.len(),
            pages_analyzed,
            processing_time
        );

        Ok(SearchResult {
            text,
            metadata: SearchMetadata {
                keywords: query.keywords.clone(),
                topics: query.topics.clone(),
                pages_analyzed,
                processing_time_ms: processing_time,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::test_support::config_for;
    use mock_gemini::{spawn_mock_gemini, MockReply};

    fn query(keywords: &[&str], topics: &[&str]) -> SearchQuery {
        SearchQuery {
            pdf_base64: "JVBERi0xLjQ=".to_string(),
            pdf_size_bytes: 8,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            topics: topics.iter().map(|s| s.to_string()).collect(),
        }
    }

    async fn service_with(reply: MockReply) -> (SearchService, mock_gemini::MockGemini) {
        let mock = spawn_mock_gemini(reply).await;
        let gemini = GeminiService::new(&config_for(&mock.base_url)).unwrap();
        (SearchService::new(Arc::new(gemini)), mock)
    }

    #[tokio::test]
    async fn returns_answer_verbatim_with_page_count() {
        let (service, _mock) = service_with(MockReply::text("[Page 2] The treaty was signed.")).await;

        let result = service.search(&query(&["treaty"], &[])).await.unwrap();
        assert_eq!(result.text, "[Page 2] The treaty was signed.");
        assert_eq!(result.metadata.pages_analyzed, 1);
        assert_eq!(result.metadata.keywords, vec!["treaty".to_string()]);
    }

    #[tokio::test]
    async fn reformats_the_answer() {
        let (service, _mock) =
            service_with(MockReply::text("- [3 | 128] (topic: peace)Peace held.\n\nno matches found for war")).await;

        let result = service.search(&query(&["war"], &["peace"])).await.unwrap();
        assert_eq!(
            result.text,
            "[PDF Page 3 | Doc Page 128] [TOPIC: peace] Peace held.\n\nNo matches found."
        );
        assert_eq!(result.metadata.pages_analyzed, 1);
    }

    #[tokio::test]
    async fn sends_the_built_prompt() {
        let (service, mock) = service_with(MockReply::text("No matches found")).await;

        let result = service.search(&query(&["treaty"], &["trade"])).await.unwrap();
        assert_eq!(result.text, "No matches found.");
        assert_eq!(result.metadata.pages_analyzed, 0);

        let sent = &mock.requests()[0].body["contents"][0]["parts"][0]["text"];
        let expected = build_prompt(&["treaty".to_string()], &["trade".to_string()]);
        assert_eq!(sent.as_str(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn whitespace_only_answers_are_empty() {
        let (service, _mock) = service_with(MockReply::text("```\n```")).await;
        let err = service.search(&query(&["a"], &[])).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyResponse);
    }
}
