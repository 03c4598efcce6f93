use std::time::Duration;

use anyhow::{Context, Result, anyhow};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub token: Option<String>,
    pub log_level: String,
    pub http_timeout: Duration,
}

impl Settings {
    /// `--server` важнее `LMS_API_URL`.
    pub fn from_env(server: Option<String>) -> Result<Self> {
        let raw_url = server
            .or_else(|| std::env::var("LMS_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = normalize_server(raw_url);

        let token = std::env::var("LMS_TOKEN")
            .ok()
            .and_then(|raw| parse_token_content(&raw));
        let log_level = std::env::var("LMS_LOG").unwrap_or_else(|_| "warn".to_string());
        let http_timeout = Duration::from_secs(parse_u64_env("LMS_HTTP_TIMEOUT_SECS", 30)?);

        Ok(Self {
            api_url,
            token,
            log_level,
            http_timeout,
        })
    }
}

pub fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

/// Обрезанный текст или `None`, если остались одни пробелы.
pub fn non_blank(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    Some(text.to_string())
}

pub fn parse_token_content(raw: &str) -> Option<String> {
    non_blank(raw)
}

fn parse_u64_env(key: &str, default: u64) -> Result<u64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://lms.example.com".to_string());
        assert_eq!(s, "https://lms.example.com");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:8000".to_string());
        assert_eq!(s, "http://127.0.0.1:8000");
    }

    #[test]
    fn explicit_server_wins() {
        let settings =
            Settings::from_env(Some("localhost:9999".to_string())).expect("settings");
        assert_eq!(settings.api_url, "http://localhost:9999");
    }

    #[test]
    fn parse_token_content_trims_whitespace() {
        let token = parse_token_content("  abc.def.ghi\n");
        assert_eq!(token.as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn parse_token_content_rejects_blank() {
        assert!(parse_token_content("   ").is_none());
    }

    #[test]
    fn non_blank_trims_titles_and_comments() {
        assert_eq!(non_blank("  Week 3 notes ").as_deref(), Some("Week 3 notes"));
        assert!(non_blank("\n\t ").is_none());
    }
}
