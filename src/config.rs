use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// Runtime settings read from the environment (after `.env` is loaded)
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub ws_url: String,
    pub session_file: PathBuf,
    /// 64 hex chars; when absent the session is kept in memory only
    pub session_key: Option<String>,
    pub page_size: u32,
    pub request_timeout: Duration,
}

impl Settings {
    const DEFAULT_API_URL: &'static str = "https://api.blaffa.net";
    const DEFAULT_SESSION_FILE: &'static str = ".blaffa_session";
    const DEFAULT_PAGE_SIZE: u32 = 10;
    const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("BLAFFA_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                name: "BLAFFA_API_URL",
                reason: "must start with http:// or https://".to_string(),
            });
        }

        let ws_url = match lookup("BLAFFA_WS_URL").filter(|v| !v.trim().is_empty()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => derive_ws_url(&api_url),
        };

        let session_file = lookup("BLAFFA_SESSION_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_SESSION_FILE));

        let session_key = match lookup("BLAFFA_SESSION_KEY").filter(|v| !v.trim().is_empty()) {
            Some(key) => {
                let key = key.trim().to_string();
                if key.len() != 64 || hex::decode(&key).is_err() {
                    return Err(ConfigError::InvalidValue {
                        name: "BLAFFA_SESSION_KEY",
                        reason: "expected 64 hex characters (32 bytes)".to_string(),
                    });
                }
                Some(key)
            }
            None => None,
        };

        let page_size = match lookup("BLAFFA_PAGE_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "BLAFFA_PAGE_SIZE",
                        reason: format!("'{}' is not a positive integer", raw),
                    })
                }
            },
            None => Self::DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match lookup("BLAFFA_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                name: "BLAFFA_REQUEST_TIMEOUT_SECS",
                reason: format!("'{}' is not a number of seconds", raw),
            })?,
            None => Self::DEFAULT_TIMEOUT_SECS,
        };

        Ok(Settings {
            api_url,
            ws_url,
            session_file,
            session_key,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn derive_ws_url(api_url: &str) -> String {
    if let Some(rest) = api_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = api_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        api_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let settings = settings_with(&[]).unwrap();
        assert_eq!(settings.api_url, "https://api.blaffa.net");
        assert_eq!(settings.ws_url, "wss://api.blaffa.net");
        assert_eq!(settings.page_size, 10);
        assert!(settings.session_key.is_none());
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_ws_url_follows_plain_http() {
        let settings = settings_with(&[("BLAFFA_API_URL", "http://localhost:8000/")]).unwrap();
        assert_eq!(settings.api_url, "http://localhost:8000");
        assert_eq!(settings.ws_url, "ws://localhost:8000");
    }

    #[test]
    fn test_rejects_bad_session_key() {
        assert!(settings_with(&[("BLAFFA_SESSION_KEY", "abcd")]).is_err());
        let key = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        let settings = settings_with(&[("BLAFFA_SESSION_KEY", key)]).unwrap();
        assert_eq!(settings.session_key.as_deref(), Some(key));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        assert!(settings_with(&[("BLAFFA_PAGE_SIZE", "0")]).is_err());
        assert!(settings_with(&[("BLAFFA_API_URL", "ftp://x")]).is_err());
    }
}
