use crate::error::SummaryError;
use crate::openai::shape::{ProviderRequestShape, extract_usage, placeholder_if_empty};
use crate::summary::markup::strip_markdown;
use crate::summary::types::{BlockRequest, BlockSummarizer, BlockSummary};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::env;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base: String,
    pub timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn from_env() -> Self {
        let api_base = match env::var("READECK_SUMMARY_API_BASE") {
            Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
            _ => DEFAULT_API_BASE.to_string(),
        };
        let timeout = env::var("READECK_SUMMARY_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        Self { api_base, timeout }
    }
}

pub struct OpenAiClient {
    http: Client,
    api_base: String,
}

impl OpenAiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        // `None` lifts reqwest's 30s blocking default; calls then run to completion.
        let http = Client::builder()
            .timeout(settings.timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, shape: ProviderRequestShape) -> String {
        format!("{}{}", self.api_base, shape.endpoint_path())
    }
}

impl BlockSummarizer for OpenAiClient {
    fn summarize_block(&self, request: &BlockRequest) -> Result<BlockSummary> {
        let shape = ProviderRequestShape::for_model(&request.model);
        let url = self.endpoint(shape);
        let body = shape.build_body(request);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&request.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummaryError::ProviderHttp {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            }
            .into());
        }

        let json: Value = response
            .json()
            .with_context(|| format!("response from {url} was not valid JSON"))?;
        let extracted = shape.extract_text(&json);
        let usage = extract_usage(&json);
        let response_status = json.get("status").and_then(Value::as_str).unwrap_or("n/a");

        tracing::debug!(
            model = %request.model,
            status = response_status,
            raw = %json,
            extracted = %extracted,
            tokens_in = usage.tokens_in,
            tokens_out = usage.tokens_out,
            "provider response"
        );

        let content = strip_markdown(&placeholder_if_empty(extracted, &json));
        Ok(BlockSummary { content, usage })
    }
}

#[cfg(test)]
mod tests {
    use super::{ClientSettings, OpenAiClient};
    use crate::error::SummaryError;
    use crate::openai::shape::INCOMPLETE_PLACEHOLDER;
    use crate::summary::types::{BlockRequest, BlockSummarizer, SummaryStyle, TargetLength};
    use mockito::Matcher;
    use serde_json::json;
    use std::io::Write;
    use std::thread;
    use std::time::Duration;

    fn client_for(server: &mockito::Server) -> OpenAiClient {
        OpenAiClient::new(&ClientSettings {
            api_base: server.url(),
            timeout: None,
        })
        .expect("client")
    }

    fn request(model: &str) -> BlockRequest {
        BlockRequest {
            api_key: "sk-test".to_string(),
            model: model.to_string(),
            title: None,
            text: "Some article.".to_string(),
            style: SummaryStyle::Concise,
            bullets: false,
            target_length: TargetLength::Medium,
        }
    }

    #[test]
    fn modern_model_posts_to_responses_endpoint() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/responses")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-5-nano",
                "max_output_tokens": 1200
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "completed",
                    "output": [{"content": [{"type": "output_text", "text": "**Bold** claim."}]}],
                    "usage": {"input_tokens": 40, "output_tokens": 9}
                })
                .to_string(),
            )
            .create();

        let out = client_for(&server)
            .summarize_block(&request("gpt-5-nano"))
            .expect("summary");
        mock.assert();
        assert_eq!(out.content, "Bold claim.");
        assert_eq!(out.usage.tokens_in, 40);
        assert_eq!(out.usage.tokens_out, 9);
    }

    #[test]
    fn classic_model_posts_to_chat_completions() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_body(Matcher::PartialJson(json!({"temperature": 0.2})))
            .with_status(200)
            .with_body(
                json!({
                    "choices": [{"message": {"content": "# Heading\nplain"}}],
                    "usage": {"prompt_tokens": 12, "completion_tokens": 3}
                })
                .to_string(),
            )
            .create();

        let out = client_for(&server)
            .summarize_block(&request("gpt-4o-mini"))
            .expect("summary");
        mock.assert();
        assert_eq!(out.content, "Heading\nplain");
        assert_eq!(out.usage.tokens_in, 12);
    }

    #[test]
    fn http_failure_surfaces_status_and_body() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/v1/responses")
            .with_status(401)
            .with_body("{\"error\":{\"message\":\"Incorrect API key\"}}")
            .create();

        let err = client_for(&server)
            .summarize_block(&request("gpt-5-nano"))
            .expect_err("401 should fail");
        let typed = err
            .downcast_ref::<SummaryError>()
            .expect("typed provider error");
        match typed {
            SummaryError::ProviderHttp {
                status,
                status_text,
                body,
            } => {
                assert_eq!(*status, 401);
                assert_eq!(status_text, "Unauthorized");
                assert!(body.contains("Incorrect API key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn incomplete_empty_response_is_a_placeholder_not_an_error() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/v1/responses")
            .with_status(200)
            .with_body(json!({"status": "incomplete", "output": []}).to_string())
            .create();

        let out = client_for(&server)
            .summarize_block(&request("gpt-5-mini"))
            .expect("placeholder is success");
        assert_eq!(out.content, INCOMPLETE_PLACEHOLDER);
        assert_eq!(out.usage.tokens_in, 0);
    }

    fn slow_completion(server: &mut mockito::Server, delay: Duration) -> mockito::Mock {
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_chunked_body(move |w| {
                thread::sleep(delay);
                w.write_all(
                    json!({"choices": [{"message": {"content": "late but fine"}}]})
                        .to_string()
                        .as_bytes(),
                )
            })
            .create()
    }

    #[test]
    fn unset_timeout_waits_past_the_transport_default() {
        let mut server = mockito::Server::new();
        let mock = slow_completion(&mut server, Duration::from_secs(32));

        let out = client_for(&server)
            .summarize_block(&request("gpt-4o-mini"))
            .expect("slow provider still answers");
        mock.assert();
        assert_eq!(out.content, "late but fine");
    }

    #[test]
    fn explicit_timeout_is_enforced() {
        let mut server = mockito::Server::new();
        slow_completion(&mut server, Duration::from_secs(3));

        let client = OpenAiClient::new(&ClientSettings {
            api_base: server.url(),
            timeout: Some(Duration::from_millis(500)),
        })
        .expect("client");
        let err = client
            .summarize_block(&request("gpt-4o-mini"))
            .expect_err("times out");
        assert!(err.downcast_ref::<SummaryError>().is_none());
    }
}
