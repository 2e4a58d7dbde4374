//! Connection settings for the Logseq HTTP API server.

use std::time::Duration;

use reqwest::Url;
use secrecy::SecretString;

use lsq_core::error::LsqError;

/// Where Logseq's HTTP API server listens by default.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:12315";

/// Upper bound on a single remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings read once at startup.
#[derive(Debug)]
pub struct ClientConfig {
    /// Base URL of the Logseq API server (without the `/api` suffix).
    pub api_url: Url,
    /// Bearer token configured in Logseq's API server settings.
    pub api_token: SecretString,
    /// Timeout applied to every request.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration, checking the URL and timeout.
    ///
    /// # Errors
    ///
    /// Returns [`LsqError::Config`] if the URL does not parse, is not
    /// `http`/`https`, the token is empty, or the timeout is zero.
    pub fn new(
        api_url: &str,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LsqError> {
        let api_url = Url::parse(api_url.trim())
            .map_err(|e| LsqError::Config(format!("invalid Logseq API URL '{api_url}': {e}")))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(LsqError::Config(format!(
                "Logseq API URL must use http or https, got '{}'",
                api_url.scheme()
            )));
        }

        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(LsqError::Config(
                "Logseq API token is empty; set LOGSEQ_API_TOKEN".to_string(),
            ));
        }

        if timeout.is_zero() {
            return Err(LsqError::Config(
                "request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_url,
            api_token: SecretString::from(api_token),
            timeout,
        })
    }

    /// The single RPC endpoint, `{api_url}/api`.
    ///
    /// # Errors
    ///
    /// Returns [`LsqError::Config`] if the joined URL is invalid.
    pub fn endpoint(&self) -> Result<Url, LsqError> {
        let base = self.api_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}/api"))
            .map_err(|e| LsqError::Config(format!("invalid Logseq API endpoint: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_api_path() {
        let config = ClientConfig::new(DEFAULT_API_URL, "token", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://127.0.0.1:12315/api"
        );

        let config =
            ClientConfig::new("http://localhost:8080/logseq/", "token", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost:8080/logseq/api"
        );
    }

    #[test]
    fn rejects_bad_settings() {
        assert!(ClientConfig::new("not a url", "token", DEFAULT_TIMEOUT).is_err());
        assert!(ClientConfig::new("ftp://host", "token", DEFAULT_TIMEOUT).is_err());
        assert!(ClientConfig::new(DEFAULT_API_URL, "  ", DEFAULT_TIMEOUT).is_err());
        assert!(ClientConfig::new(DEFAULT_API_URL, "token", Duration::ZERO).is_err());
    }

    #[test]
    fn debug_output_hides_token() {
        let config = ClientConfig::new(DEFAULT_API_URL, "s3cret-token", DEFAULT_TIMEOUT).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret-token"));
    }
}
