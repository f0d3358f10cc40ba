use serde::{Deserialize, Serialize};

/// `extract --json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRecord {
    pub url: String,
    pub body_found: bool,
    pub text: String,
}

/// One line of `scrape --json` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeRecord {
    pub url: String,
    pub ok: bool,
    pub chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
