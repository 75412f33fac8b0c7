//! Gemini `generateContent` client

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{GenerationRequest, Generator};
use crate::{Error, Result};

/// Public Gemini API endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Calls the Gemini API over HTTPS
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the public endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn new(api_key: SecretString) -> Result<Self> {
        Self::with_base_url(api_key, GEMINI_BASE_URL.to_string())
    }

    /// Create a client against a custom endpoint (proxies, local mocks)
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty
    pub fn with_base_url(api_key: SecretString, base_url: String) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Gemini API key required".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Instruction<'a>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Instruction<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Concatenate the text parts of the first candidate
fn extract_text(response: GeminiResponse) -> Result<String> {
    if let Some(error) = response.error {
        return Err(Error::Upstream(format!("Gemini error: {}", error.message)));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(Error::Upstream("Gemini returned no text".to_string()));
    }

    Ok(text)
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let body = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: &request.user_text,
                }],
            }],
            system_instruction: Instruction {
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        };

        tracing::debug!(model = %request.model, "calling Gemini generateContent");

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upstream(format!("Gemini API error {status}: {body}")));
        }

        let parsed: GeminiResponse = response.json().await?;
        extract_text(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String> {
        extract_text(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn joins_parts_of_first_candidate() {
        let text = parse(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Keep "},{"text":"going."}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(text, "Keep going.");
    }

    #[test]
    fn error_body_becomes_upstream_error() {
        let err = parse(r#"{"error":{"code":403,"message":"API key not valid"}}"#).unwrap_err();
        assert!(matches!(err, Error::Upstream(ref m) if m.contains("API key not valid")));
    }

    #[test]
    fn missing_candidates_is_an_error() {
        assert!(matches!(parse("{}"), Err(Error::Upstream(_))));
        assert!(matches!(
            parse(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            Err(Error::Upstream(_))
        ));
    }

    #[test]
    fn request_serializes_gemini_shape() {
        let body = GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: "I feel stuck" }],
            }],
            system_instruction: Instruction {
                parts: vec![Part { text: "You are \"Philosopher\"." }],
            },
            generation_config: GenerationConfig { temperature: 0.5 },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "I feel stuck");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You are \"Philosopher\".");
        assert_eq!(json["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn empty_key_is_rejected() {
        let result = GeminiClient::new(SecretString::from(String::new()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::with_base_url(
            SecretString::from("k".to_string()),
            "http://localhost:9000/".to_string(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }
}
