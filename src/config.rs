use std::time::Duration;

use serde::Deserialize;

pub const LICHESS_URL: &str = "https://lichess.org";
pub const CHESSCOM_API_URL: &str = "https://api.chess.com";
pub const CHESSCOM_WEB_URL: &str = "https://www.chess.com";

/// Where requests go and how the underlying HTTP client is built.
///
/// Base URLs only decide where requests are sent. Links inside normalized
/// records always point at the public sites.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub lichess_url: String,
    pub chesscom_api_url: String,
    pub chesscom_web_url: String,
    pub user_agent: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            lichess_url: LICHESS_URL.to_string(),
            chesscom_api_url: CHESSCOM_API_URL.to_string(),
            chesscom_web_url: CHESSCOM_WEB_URL.to_string(),
            user_agent: None,
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub(crate) fn build_http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{ "user_agent": "chess-fetch-tests" }"#).unwrap();
        assert_eq!(config.lichess_url, LICHESS_URL);
        assert_eq!(config.chesscom_api_url, CHESSCOM_API_URL);
        assert_eq!(config.user_agent.as_deref(), Some("chess-fetch-tests"));
    }
}
