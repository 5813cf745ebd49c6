use crate::summary::types::{BlockRequest, Usage};
use serde_json::{Value, json};

pub const INCOMPLETE_PLACEHOLDER: &str =
    "[Warning: response incomplete - partial data returned. Try a longer token limit.]";
pub const EMPTY_PLACEHOLDER: &str =
    "[Warning: no summary text returned - check the debug log for raw data.]";

const CLASSIC_TEMPERATURE: f64 = 0.2;
const MODERN_REASONING_EFFORT: &str = "low";

/// Request/response dialect, chosen from the model identifier alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderRequestShape {
    /// `/v1/responses`: input list, output-token cap, reasoning effort.
    Modern,
    /// `/v1/chat/completions`: message list, temperature, token cap.
    Classic,
}

impl ProviderRequestShape {
    pub fn for_model(model: &str) -> Self {
        if model.to_ascii_lowercase().contains("gpt-5") {
            Self::Modern
        } else {
            Self::Classic
        }
    }

    pub fn endpoint_path(self) -> &'static str {
        match self {
            Self::Modern => "/v1/responses",
            Self::Classic => "/v1/chat/completions",
        }
    }

    pub fn build_body(self, request: &BlockRequest) -> Value {
        let messages = json!([
            {"role": "system", "content": system_prompt(request)},
            {"role": "user", "content": user_prompt(request)}
        ]);
        let token_limit = request.target_length.output_token_budget();
        match self {
            Self::Modern => json!({
                "model": request.model,
                "input": messages,
                "max_output_tokens": token_limit,
                "reasoning": {"effort": MODERN_REASONING_EFFORT}
            }),
            Self::Classic => json!({
                "model": request.model,
                "messages": messages,
                "temperature": CLASSIC_TEMPERATURE,
                "max_tokens": token_limit
            }),
        }
    }

    /// Pull the summary text out of a successful response. Returns an empty
    /// string when the response carries no usable text.
    pub fn extract_text(self, json: &Value) -> String {
        match self {
            Self::Modern => extract_modern_text(json),
            Self::Classic => extract_classic_text(json),
        }
    }
}

pub fn system_prompt(request: &BlockRequest) -> String {
    let format = if request.bullets {
        "Bullet points"
    } else {
        "Short paragraphs"
    };
    format!(
        "You are an expert summarizer. {} summary. {format}. Avoid fluff; keep key facts and context.",
        request.style.label()
    )
}

pub fn user_prompt(request: &BlockRequest) -> String {
    match request.title.as_deref().map(str::trim) {
        Some(title) if !title.is_empty() => {
            format!("Title: {title}\n\nArticle:\n{}", request.text)
        }
        _ => format!("Article:\n{}", request.text),
    }
}

fn extract_modern_text(json: &Value) -> String {
    let mut parts = Vec::new();

    if let Some(output) = json.get("output").and_then(Value::as_array) {
        for item in output {
            let Some(content) = item.get("content").and_then(Value::as_array) else {
                continue;
            };
            for part in content {
                let is_text = part
                    .get("type")
                    .and_then(Value::as_str)
                    .is_some_and(|t| t.contains("text"));
                if !is_text {
                    continue;
                }
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        parts.push(trimmed.to_string());
                    }
                }
            }
        }
    }

    // output_text often shows up on its own for incomplete responses
    if let Some(text) = json.get("output_text").and_then(Value::as_str) {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    parts.join("\n\n").trim().to_string()
}

fn extract_classic_text(json: &Value) -> String {
    json.get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

pub fn is_incomplete(json: &Value) -> bool {
    json.get("status").and_then(Value::as_str) == Some("incomplete")
}

/// Substitute a visible diagnostic when extraction came back empty.
pub fn placeholder_if_empty(content: String, json: &Value) -> String {
    if !content.is_empty() {
        return content;
    }
    if is_incomplete(json) {
        INCOMPLETE_PLACEHOLDER.to_string()
    } else {
        EMPTY_PLACEHOLDER.to_string()
    }
}

fn positive_u64(usage: &Value, key: &str) -> Option<u64> {
    usage.get(key).and_then(Value::as_u64).filter(|v| *v > 0)
}

/// Read token usage, preferring `prompt_tokens`/`completion_tokens` over
/// `input_tokens`/`output_tokens`. Missing fields count as zero.
pub fn extract_usage(json: &Value) -> Usage {
    let Some(usage) = json.get("usage") else {
        return Usage::default();
    };
    Usage {
        tokens_in: positive_u64(usage, "prompt_tokens")
            .or_else(|| positive_u64(usage, "input_tokens"))
            .unwrap_or(0),
        tokens_out: positive_u64(usage, "completion_tokens")
            .or_else(|| positive_u64(usage, "output_tokens"))
            .unwrap_or(0),
    }
}
