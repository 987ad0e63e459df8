//! Request and response shapes shared with the transport

use serde::{Deserialize, Serialize};

/// Maximum page title length accepted by Telegraph, in characters.
pub const TITLE_LIMIT: usize = 256;

/// Maximum author name length, in characters.
pub const AUTHOR_NAME_LIMIT: usize = 128;

/// Maximum author URL length, in characters.
pub const AUTHOR_URL_LIMIT: usize = 512;

/// Length of a well-formed Telegraph access token.
pub const TOKEN_LENGTH: usize = 60;

/// A page ready for submission.
///
/// `content` is already sanitized HTML. Field limits are applied by
/// `truncated()` right before submission, not at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub author_name: String,
    pub author_url: String,
    pub content: String,
}

impl Document {
    /// Copy of this document with title and author fields cut to the
    /// service limits.
    pub fn truncated(&self) -> Document {
        Document {
            title: truncate_chars(&self.title, TITLE_LIMIT),
            author_name: truncate_chars(&self.author_name, AUTHOR_NAME_LIMIT),
            author_url: truncate_chars(&self.author_url, AUTHOR_URL_LIMIT),
            content: self.content.clone(),
        }
    }
}

/// Cut `value` to at most `limit` characters without splitting a code point.
fn truncate_chars(value: &str, limit: usize) -> String {
    match value.char_indices().nth(limit) {
        Some((byte_idx, _)) => value[..byte_idx].to_string(),
        None => value.to_string(),
    }
}

/// A published page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub path: String,
    pub url: String,
    #[serde(default)]
    pub title: String,
}

/// Identity used when registering a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountProfile {
    pub short_name: String,
    pub author_name: String,
    pub author_url: String,
}

impl Default for AccountProfile {
    fn default() -> Self {
        Self {
            short_name: "RSStT".into(),
            author_name: "Generated by RSStT".into(),
            author_url: "https://github.com/Rongronggg9/RSS-to-Telegram-Bot".into(),
        }
    }
}

/// Account details returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub short_name: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_url: String,
}
