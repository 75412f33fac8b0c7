//! Client side of `POST /api/process-text`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What the gateway said about a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply {
    /// 2xx with a response text
    Answer(String),
    /// Non-2xx with the server's error payload
    Rejected {
        status: u16,
        error: String,
        details: Option<String>,
    },
}

/// Sends transcripts to the gateway
#[async_trait]
pub trait GatewayApi: Send + Sync {
    /// Submit one transcript
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] or [`Error::Http`] if the gateway is
    /// unreachable or its response cannot be read
    async fn process_text(&self, text: &str, persona: &str) -> Result<GatewayReply>;
}

/// HTTP implementation of [`GatewayApi`]
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpGateway {
    /// Target the gateway at `base_url` (e.g. `http://localhost:3000`)
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/process-text", base_url.trim_end_matches('/')),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    user_text: &'a str,
    persona: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireReply {
    response_text: Option<String>,
    error: Option<String>,
    details: Option<String>,
}

/// Interpret a status and body from the gateway
fn decode_reply(status: reqwest::StatusCode, body: &[u8]) -> Result<GatewayReply> {
    let reply: WireReply = serde_json::from_slice(body)
        .map_err(|e| Error::Transport(format!("unreadable gateway response ({status}): {e}")))?;

    if status.is_success() {
        return reply
            .response_text
            .map(GatewayReply::Answer)
            .ok_or_else(|| Error::Transport("gateway response has no responseText".to_string()));
    }

    Ok(GatewayReply::Rejected {
        status: status.as_u16(),
        error: reply
            .error
            .unwrap_or_else(|| "Unknown server error.".to_string()),
        details: reply.details,
    })
}

#[async_trait]
impl GatewayApi for HttpGateway {
    async fn process_text(&self, text: &str, persona: &str) -> Result<GatewayReply> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&WireRequest {
                user_text: text,
                persona,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        decode_reply(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn success_decodes_answer() {
        let reply = decode_reply(StatusCode::OK, br#"{"responseText":"Keep going."}"#).unwrap();
        assert_eq!(reply, GatewayReply::Answer("Keep going.".to_string()));
    }

    #[test]
    fn server_error_keeps_details() {
        let reply = decode_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"error":"AI Error","details":"quota exceeded"}"#,
        )
        .unwrap();
        assert_eq!(
            reply,
            GatewayReply::Rejected {
                status: 500,
                error: "AI Error".to_string(),
                details: Some("quota exceeded".to_string()),
            }
        );
    }

    #[test]
    fn error_without_message_gets_placeholder() {
        let reply = decode_reply(StatusCode::BAD_GATEWAY, b"{}").unwrap();
        assert!(matches!(reply, GatewayReply::Rejected { ref error, .. } if error == "Unknown server error."));
    }

    #[test]
    fn non_json_body_is_a_transport_error() {
        let err = decode_reply(StatusCode::OK, b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[test]
    fn success_without_text_is_a_transport_error() {
        assert!(matches!(decode_reply(StatusCode::OK, b"{}"), Err(Error::Transport(_))));
    }

    #[test]
    fn endpoint_is_joined_once() {
        let gateway = HttpGateway::new("http://localhost:3000/");
        assert_eq!(gateway.endpoint, "http://localhost:3000/api/process-text");
    }
}
