use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Missing OpenAI API key. Run `readeck-sum config set --api-key <KEY>` or open the extension options and paste your key.")]
    MissingCredential,
    #[error("OpenAI HTTP {status} {status_text} - {body}")]
    ProviderHttp {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("Unknown message type")]
    UnknownMessageType,
    #[error("No article text found.")]
    MissingArticleText,
    #[error("malformed message: {0}")]
    MalformedMessage(String),
}

impl SummaryError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ProviderHttp { status, .. } => Some(*status),
            _ => None,
        }
    }
}
