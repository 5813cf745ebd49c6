use crate::error::SummaryError;
use crate::summary::audit;
use crate::summary::config::{ConfigStore, ConfigUpdate};
use crate::summary::paths::SummaryPaths;
use crate::summary::pipeline::summarize_full;
use crate::summary::session_cache::SessionCache;
use crate::summary::types::{
    BlockSummarizer, SummarizationRequest, SummarizationResult, SummaryStyle, TargetLength,
};
use crate::summary::util::truncate_chars;
use anyhow::Result;
use serde::Deserialize;
use serde_json::{Map, Value, json};

/// Article text beyond this many characters is dropped before summarizing.
pub const MAX_ARTICLE_CHARS: usize = 120_000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetConfigMessage {
    api_key: Option<String>,
    model: Option<String>,
    target_length: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummarizePayload {
    title: Option<String>,
    #[serde(default)]
    text: String,
    style: Option<String>,
    #[serde(default)]
    bullets: bool,
    article_id: Option<String>,
    #[serde(default)]
    regenerate: bool,
}

#[derive(Debug)]
enum BridgeRequest {
    Ping,
    GetConfig,
    SetConfig(SetConfigMessage),
    Summarize(SummarizePayload),
}

fn parse_request(msg: &Value) -> Result<BridgeRequest> {
    let kind = msg.get("type").and_then(Value::as_str).unwrap_or_default();
    let request = match kind {
        "PING" => BridgeRequest::Ping,
        "GET_CONFIG" => BridgeRequest::GetConfig,
        "SET_CONFIG" => BridgeRequest::SetConfig(
            serde_json::from_value(msg.clone())
                .map_err(|err| SummaryError::MalformedMessage(err.to_string()))?,
        ),
        "SUMMARIZE" => {
            let payload = match msg.get("payload") {
                None | Some(Value::Null) => SummarizePayload::default(),
                Some(raw) => serde_json::from_value(raw.clone())
                    .map_err(|err| SummaryError::MalformedMessage(err.to_string()))?,
            };
            BridgeRequest::Summarize(payload)
        }
        _ => return Err(SummaryError::UnknownMessageType.into()),
    };
    Ok(request)
}

fn ok_response(fields: Value) -> Value {
    let mut out = Map::new();
    out.insert("ok".to_string(), Value::Bool(true));
    if let Value::Object(extra) = fields {
        out.extend(extra);
    }
    Value::Object(out)
}

pub fn error_response(message: &str) -> Value {
    json!({"ok": false, "error": message})
}

/// Request/response relay between the page and the process holding the key.
pub struct Bridge<'a> {
    store: &'a dyn ConfigStore,
    summarizer: &'a dyn BlockSummarizer,
    audit_paths: Option<SummaryPaths>,
    cache: SessionCache,
}

impl<'a> Bridge<'a> {
    pub fn new(store: &'a dyn ConfigStore, summarizer: &'a dyn BlockSummarizer) -> Self {
        Self {
            store,
            summarizer,
            audit_paths: None,
            cache: SessionCache::default(),
        }
    }

    pub fn with_audit(mut self, paths: SummaryPaths) -> Self {
        self.audit_paths = Some(paths);
        self
    }

    /// Answer one message. Never fails: errors become `{ok: false, error}`.
    pub fn handle(&mut self, msg: &Value) -> Value {
        match self.dispatch(msg) {
            Ok(response) => response,
            Err(err) => {
                let status = err
                    .downcast_ref::<SummaryError>()
                    .and_then(SummaryError::status);
                tracing::warn!(error = %format!("{err:#}"), status = ?status, "bridge request failed");
                error_response(&format!("{err:#}"))
            }
        }
    }

    fn dispatch(&mut self, msg: &Value) -> Result<Value> {
        match parse_request(msg)? {
            BridgeRequest::Ping => Ok(ok_response(json!({}))),
            BridgeRequest::GetConfig => {
                let cfg = self.store.get()?;
                Ok(ok_response(json!({
                    "hasKey": cfg.has_key(),
                    "model": cfg.model,
                    "targetLength": cfg.target_length.as_str(),
                })))
            }
            BridgeRequest::SetConfig(update) => {
                self.store.set(&ConfigUpdate {
                    api_key: update.api_key,
                    model: update.model,
                    target_length: update
                        .target_length
                        .as_deref()
                        .map(TargetLength::parse_lenient),
                })?;
                Ok(ok_response(json!({})))
            }
            BridgeRequest::Summarize(payload) => {
                let result = self.summarize(payload)?;
                Ok(ok_response(serde_json::to_value(result)?))
            }
        }
    }

    fn summarize(&mut self, payload: SummarizePayload) -> Result<SummarizationResult> {
        let article_id = payload
            .article_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToOwned::to_owned);

        if let Some(id) = article_id.as_deref() {
            if payload.regenerate {
                self.cache.invalidate(id);
            } else if let Some(hit) = self.cache.get(id) {
                tracing::debug!(article_id = id, "session cache hit");
                return Ok(hit.clone());
            }
        }

        let text = payload.text.trim();
        if text.is_empty() {
            return Err(SummaryError::MissingArticleText.into());
        }

        let request = SummarizationRequest {
            title: payload.title,
            text: truncate_chars(text, MAX_ARTICLE_CHARS).to_string(),
            style: payload
                .style
                .as_deref()
                .map(SummaryStyle::parse_lenient)
                .unwrap_or_default(),
            bullets: payload.bullets,
        };

        match summarize_full(self.store, self.summarizer, &request) {
            Ok(result) => {
                audit::record(
                    self.audit_paths.as_ref(),
                    "summarize",
                    "ok",
                    &format!(
                        "model={} chunks={} tokens_in={} tokens_out={}",
                        result.model, result.chunk_count, result.tokens_in, result.tokens_out
                    ),
                );
                if let Some(id) = article_id.as_deref() {
                    self.cache.insert(id, result.clone());
                }
                Ok(result)
            }
            Err(err) => {
                audit::record(
                    self.audit_paths.as_ref(),
                    "summarize",
                    "error",
                    &format!("{err:#}"),
                );
                Err(err)
            }
        }
    }
}
