use crate::error::SummaryError;
use crate::summary::chunk::{MAX_CHUNK_CHARS, chunk_text};
use crate::summary::config::ConfigStore;
use crate::summary::types::{
    BlockRequest, BlockSummarizer, SummarizationRequest, SummarizationResult, Usage,
};
use anyhow::Result;

/// Summarize an article: one provider call per chunk, in order, then a single
/// reduce call over the joined partials when the article needed more than one
/// chunk. Settings are read once, before any chunking or network activity.
pub fn summarize_full(
    store: &dyn ConfigStore,
    summarizer: &dyn BlockSummarizer,
    request: &SummarizationRequest,
) -> Result<SummarizationResult> {
    let config = store.get()?;
    if !config.has_key() {
        return Err(SummaryError::MissingCredential.into());
    }

    let chunks = chunk_text(&request.text, MAX_CHUNK_CHARS);
    let block_for = |text: String| BlockRequest {
        api_key: config.api_key.clone(),
        model: config.model.clone(),
        title: request.title.clone(),
        text,
        style: request.style,
        bullets: request.bullets,
        target_length: config.target_length,
    };

    let mut usage = Usage::default();
    let mut partials = Vec::with_capacity(chunks.len());
    for (idx, chunk) in chunks.iter().enumerate() {
        tracing::debug!(chunk = idx + 1, of = chunks.len(), "summarizing chunk");
        let out = summarizer.summarize_block(&block_for((*chunk).to_string()))?;
        usage.add(out.usage);
        partials.push(out.content);
    }

    let mut summary = partials.join("\n\n");
    if partials.len() > 1 {
        tracing::debug!(partials = partials.len(), "reducing partial summaries");
        let out = summarizer.summarize_block(&block_for(summary))?;
        usage.add(out.usage);
        summary = out.content;
    }

    Ok(SummarizationResult {
        summary,
        model: config.model,
        chunk_count: chunks.len(),
        tokens_in: usage.tokens_in,
        tokens_out: usage.tokens_out,
    })
}
