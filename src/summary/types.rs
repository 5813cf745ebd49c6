use anyhow::Result;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryStyle {
    #[default]
    Concise,
    Detailed,
}

impl SummaryStyle {
    /// Anything other than `detailed` reads as concise.
    pub fn parse_lenient(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("detailed") {
            Self::Detailed
        } else {
            Self::Concise
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Concise => "Concise",
            Self::Detailed => "Detailed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetLength {
    Short,
    #[default]
    Medium,
    Long,
}

impl TargetLength {
    /// Unknown or blank values fall back to `medium`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    pub fn output_token_budget(self) -> u32 {
        match self {
            Self::Short => 500,
            Self::Medium => 1200,
            Self::Long => 2500,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub tokens_in: u64,
    pub tokens_out: u64,
}

impl Usage {
    pub fn add(&mut self, other: Usage) {
        self.tokens_in = self.tokens_in.saturating_add(other.tokens_in);
        self.tokens_out = self.tokens_out.saturating_add(other.tokens_out);
    }
}

/// One provider call: a single chunk, or the merged partial summaries.
#[derive(Debug, Clone)]
pub struct BlockRequest {
    pub api_key: String,
    pub model: String,
    pub title: Option<String>,
    pub text: String,
    pub style: SummaryStyle,
    pub bullets: bool,
    pub target_length: TargetLength,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    pub content: String,
    pub usage: Usage,
}

pub trait BlockSummarizer {
    fn summarize_block(&self, request: &BlockRequest) -> Result<BlockSummary>;
}

#[derive(Debug, Clone, Default)]
pub struct SummarizationRequest {
    pub title: Option<String>,
    pub text: String,
    pub style: SummaryStyle,
    pub bullets: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizationResult {
    pub summary: String,
    pub model: String,
    #[serde(rename = "chunks")]
    pub chunk_count: usize,
    pub tokens_in: u64,
    pub tokens_out: u64,
}
