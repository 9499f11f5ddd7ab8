//! Generative model client for legal-risk analysis
//!
//! Sends one document plus a fixed analysis prompt and returns the model's
//! reply as plain text. The reply is expected (not guaranteed) to use the
//! four section headers named in [`ANALYSIS_PROMPT`].

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::upload::DocumentKind;

/// Instruction sent with every document.
pub const ANALYSIS_PROMPT: &str = r#"You are an experienced legal analyst. Review the attached document and identify anything a non-lawyer signing it should know about.

Structure your answer with exactly these four headers, in this order, each on its own line and followed by a colon:

KEY IMPORTANT POINTS:
The main obligations, dates, amounts, and parties. One point per line, starting with "- ".

SUSPICIOUS ELEMENTS:
Unusual, one-sided, hidden, or ambiguous clauses. One per line, starting with "- ". Write "- None found" if there are none.

RISK ASSESSMENT:
An overall risk level (Low, Medium, or High) followed by a short justification.

RECOMMENDATIONS:
Concrete actions to take before signing. One per line, starting with "- ".

Use plain text only. Do not use markdown headings, bold text, or tables."#;

/// Document handed to a model.
#[derive(Debug, Clone, Copy)]
pub struct DocumentPayload<'a> {
    pub file_name: &'a str,
    pub kind: DocumentKind,
    pub bytes: &'a [u8],
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("GEMINI_API_KEY is not configured")]
    NotConfigured,
    #[error("request to model failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text")]
    EmptyResponse,
}

/// Anything that can turn a document into analysis text.
#[async_trait]
pub trait AnalysisModel: Send + Sync {
    /// Model identifier, for logs and `/health`
    fn name(&self) -> &str;

    async fn analyze(&self, document: DocumentPayload<'_>) -> Result<String, ModelError>;
}

// ============================================================================
// Gemini REST API
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            api_base: api_base.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl AnalysisModel for GeminiClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, document: DocumentPayload<'_>) -> Result<String, ModelError> {
        let request = build_request(&document);

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        response_text(parsed).ok_or(ModelError::EmptyResponse)
    }
}

fn build_request<'a>(document: &DocumentPayload<'a>) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: ANALYSIS_PROMPT },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: document.kind.mime_type(),
                        data: STANDARD.encode(document.bytes),
                    },
                },
            ],
        }],
    }
}

/// Concatenated text parts of the first candidate, if any.
fn response_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.chars().take(300).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let document = DocumentPayload {
            file_name: "lease.pdf",
            kind: DocumentKind::Pdf,
            bytes: b"%PDF-1.4",
        };
        let json = serde_json::to_value(build_request(&document)).unwrap();
        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["text"], ANALYSIS_PROMPT);
        assert_eq!(parts[1]["inline_data"]["mime_type"], "application/pdf");
        assert_eq!(parts[1]["inline_data"]["data"], "JVBERi0xLjQ=");
    }

    #[test]
    fn test_prompt_names_every_section() {
        for marker in crate::analysis::SectionMarker::ALL {
            assert!(ANALYSIS_PROMPT.contains(&format!("{}:", marker.label())));
        }
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"KEY IMPORTANT POINTS:\n"},{"text":"- Rent is due monthly"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(
            response_text(response).as_deref(),
            Some("KEY IMPORTANT POINTS:\n- Rent is due monthly")
        );
    }

    #[test]
    fn test_response_without_text_is_empty() {
        let blocked: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
        assert!(response_text(blocked).is_none());

        let none: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(response_text(none).is_none());
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
        assert_eq!(api_error_message(""), "no response body");
        assert_eq!(api_error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new(
            "key",
            "gemini-1.5-flash",
            "https://example.test/v1beta/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
