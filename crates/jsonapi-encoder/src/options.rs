//! # Encoder Options
//!
//! Static configuration of an [`Encoder`](crate::Encoder). The struct derives
//! `Deserialize`, so applications can keep it in their own config files.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Prepended to every URL the encoder emits.
    pub url_prefix: Option<String>,
    /// Pretty-print the rendered text.
    pub pretty: bool,
    /// When set, documents carry `"jsonapi": {"version": ...}`.
    pub json_api_version: Option<String>,
}

impl EncoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = Some(prefix.into());
        self
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    #[must_use]
    pub fn with_json_api_version(mut self, version: impl Into<String>) -> Self {
        self.json_api_version = Some(version.into());
        self
    }

    /// Applies `url_prefix` to a URL or path.
    pub fn url(&self, url: &str) -> String {
        match &self.url_prefix {
            Some(prefix) => format!("{prefix}{url}"),
            None => url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_prefix() {
        assert_eq!(EncoderOptions::new().url("/posts/1"), "/posts/1");
        let options = EncoderOptions::new().with_url_prefix("https://api.example.com");
        assert_eq!(options.url("/posts/1"), "https://api.example.com/posts/1");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let options: EncoderOptions = serde_json::from_str(r#"{"pretty":true}"#).unwrap();
        assert!(options.pretty);
        assert_eq!(options.url_prefix, None);
        assert_eq!(options.json_api_version, None);
    }
}
