use std::env;

use anyhow::Result;

/// Default analysis service root (the service's local development address).
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:8000";

/// Default path of the analysis endpoint under the service root.
pub const DEFAULT_ANALYZE_PATH: &str = "/analyze-video";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so any
/// of these can live there instead of the shell environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Endpoint root for the analysis POST (LUCID_SERVICE_URL).
    pub service_base_url: String,
    /// Path of the analysis endpoint, appended to the base URL (LUCID_ANALYZE_PATH).
    pub analyze_path: String,
    /// Optional remote asset for the decorative background (LUCID_DECORATION_URL).
    /// Unset means no decoration is loaded at all.
    pub decoration_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_base_url: DEFAULT_SERVICE_URL.to_string(),
            analyze_path: DEFAULT_ANALYZE_PATH.to_string(),
            decoration_url: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every setting has a default, so this never fails on a bare
    /// environment. Empty values are treated as unset.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            service_base_url: non_empty_var("LUCID_SERVICE_URL")
                .unwrap_or(defaults.service_base_url),
            analyze_path: non_empty_var("LUCID_ANALYZE_PATH")
                .map(|p| normalize_path(&p))
                .unwrap_or(defaults.analyze_path),
            decoration_url: non_empty_var("LUCID_DECORATION_URL"),
        })
    }

    /// Full URL the multipart upload is POSTed to.
    pub fn analyze_url(&self) -> String {
        format!(
            "{}{}",
            self.service_base_url.trim_end_matches('/'),
            normalize_path(&self.analyze_path)
        )
    }

    /// Check that the service URL is usable.
    /// Call this before building the HTTP client.
    pub fn require_service(&self) -> Result<()> {
        let url = self.service_base_url.trim();
        if url.is_empty() {
            anyhow::bail!(
                "LUCID_SERVICE_URL is empty. Set it in your .env file,\n\
                 e.g. LUCID_SERVICE_URL={DEFAULT_SERVICE_URL}"
            );
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!(
                "LUCID_SERVICE_URL must start with http:// or https:// (got {url})"
            );
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn normalize_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
