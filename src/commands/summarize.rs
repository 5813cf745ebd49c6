use anyhow::{Context, Result};
use std::fs;
use std::io::{self, Read};

use crate::commands::{open_client, open_store};
use crate::error::SummaryError;
use crate::summary::audit;
use crate::summary::paths::resolve_paths;
use crate::summary::pipeline::summarize_full;
use crate::summary::types::{SummarizationRequest, SummarizationResult, SummaryStyle};

#[derive(Debug, Clone, Default)]
pub struct SummarizeOptions {
    pub file: Option<String>,
    pub title: Option<String>,
    pub style: Option<String>,
    pub bullets: bool,
}

fn read_article(file: Option<&str>) -> Result<String> {
    match file {
        Some(path) if path != "-" => {
            fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read article text from stdin")?;
            Ok(buf)
        }
    }
}

pub fn run(opts: &SummarizeOptions) -> Result<SummarizationResult> {
    let paths = resolve_paths()?;
    let text = read_article(opts.file.as_deref())?;
    let text = text.trim();
    if text.is_empty() {
        return Err(SummaryError::MissingArticleText.into());
    }

    let request = SummarizationRequest {
        title: opts.title.clone().filter(|t| !t.trim().is_empty()),
        text: text.to_string(),
        style: opts
            .style
            .as_deref()
            .map(SummaryStyle::parse_lenient)
            .unwrap_or_default(),
        bullets: opts.bullets,
    };

    let store = open_store(&paths);
    let client = open_client()?;
    match summarize_full(&store, &client, &request) {
        Ok(result) => {
            audit::record(
                Some(&paths),
                "summarize",
                "ok",
                &format!("model={} chunks={}", result.model, result.chunk_count),
            );
            Ok(result)
        }
        Err(err) => {
            audit::record(Some(&paths), "summarize", "error", &format!("{err:#}"));
            Err(err)
        }
    }
}

/// Footer line shown under a rendered summary.
pub fn meta_line(result: &SummarizationResult) -> String {
    let mut meta = vec![format!("Model: {}", result.model)];
    if result.tokens_in > 0 || result.tokens_out > 0 {
        meta.push(format!(
            "Tokens Sent: {} • Tokens Received: {}",
            result.tokens_in, result.tokens_out
        ));
    }
    meta.join(" • ")
}
