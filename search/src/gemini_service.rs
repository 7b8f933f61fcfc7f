use crate::config::Config;
use crate::error::{Result, SearchError};
use crate::models::*;
use reqwest::Client;

const PDF_MIME_TYPE: &str = "application/pdf";

pub struct GeminiService {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiService {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends the prompt and the inline PDF in one `generateContent` call. No retries.
    pub async fn generate_content(&self, prompt: &str, pdf_base64: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SearchError::Configuration("GEMINI_API_KEY environment variable not set".to_string()))?;

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text {
                        text: prompt.to_string(),
                    },
                    GeminiPart::InlineData {
                        inline_data: GeminiInlineData {
                            mime_type: PDF_MIME_TYPE.to_string(),
                            data: pdf_base64.to_string(),
                        },
                    },
                ],
            }],
            generation_config: Some(GeminiGenerationConfig {
                temperature: 0.3,
                response_mime_type: "text/plain".to_string(),
            }),
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log::warn!("Gemini API returned {}", status);
            return Err(SearchError::from_upstream(status, &error_text));
        }

        let gemini_response: GeminiResponse = response.json().await?;

        gemini_response.first_text().ok_or(SearchError::EmptyResponse)
    }
}
