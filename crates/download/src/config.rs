use std::time::Duration;

use folio_core::credentials::BearerToken;

/// Default backend origin for local development.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
/// Budget for probes and ordinary API calls.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);
/// Budget for a full document transfer.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_REDIRECTS: usize = 5;
/// 256 MiB.
pub const DEFAULT_MAX_DOWNLOAD_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Resolver settings, built once and passed to the transport and the
/// resolver at construction time.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Backend origin, without trailing slash.
    pub backend_url: String,
    pub api_timeout: Duration,
    pub download_timeout: Duration,
    pub max_redirects: usize,
    pub max_download_bytes: u64,
    /// Generic DOCX document offered when every real candidate fails.
    /// Unset disables the fallback.
    pub fallback_docx_url: Option<String>,
    pub token: Option<BearerToken>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_timeout: DEFAULT_API_TIMEOUT,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            max_download_bytes: DEFAULT_MAX_DOWNLOAD_BYTES,
            fallback_docx_url: None,
            token: None,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                 |
    /// |-------------------------------|-------------------------|
    /// | `FOLIO_BACKEND_URL`           | `http://localhost:5000` |
    /// | `FOLIO_API_TIMEOUT_SECS`      | `30`                    |
    /// | `FOLIO_DOWNLOAD_TIMEOUT_SECS` | `120`                   |
    /// | `FOLIO_MAX_REDIRECTS`         | `5`                     |
    /// | `FOLIO_MAX_DOWNLOAD_BYTES`    | `268435456`             |
    /// | `FOLIO_FALLBACK_DOCX_URL`     | unset                   |
    /// | `FOLIO_API_TOKEN`             | unset                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from an
    /// arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let backend_url = match lookup("FOLIO_BACKEND_URL") {
            Some(url) => parse_base_url("FOLIO_BACKEND_URL", &url)?,
            None => defaults.backend_url,
        };

        let api_timeout = parse_secs(&lookup, "FOLIO_API_TIMEOUT_SECS", defaults.api_timeout)?;
        let download_timeout = parse_secs(
            &lookup,
            "FOLIO_DOWNLOAD_TIMEOUT_SECS",
            defaults.download_timeout,
        )?;

        let max_redirects = match lookup("FOLIO_MAX_REDIRECTS") {
            Some(v) => parse_number::<usize>("FOLIO_MAX_REDIRECTS", &v)?,
            None => defaults.max_redirects,
        };

        let max_download_bytes = match lookup("FOLIO_MAX_DOWNLOAD_BYTES") {
            Some(v) => {
                let n = parse_number::<u64>("FOLIO_MAX_DOWNLOAD_BYTES", &v)?;
                if n == 0 {
                    return Err(invalid("FOLIO_MAX_DOWNLOAD_BYTES", &v, "must be positive"));
                }
                n
            }
            None => defaults.max_download_bytes,
        };

        let fallback_docx_url = match lookup("FOLIO_FALLBACK_DOCX_URL")
            .filter(|v| !v.trim().is_empty())
        {
            Some(url) => Some(parse_base_url("FOLIO_FALLBACK_DOCX_URL", &url)?),
            None => None,
        };

        let token = lookup("FOLIO_API_TOKEN").and_then(BearerToken::new);

        Ok(Self {
            backend_url,
            api_timeout,
            download_timeout,
            max_redirects,
            max_download_bytes,
            fallback_docx_url,
            token,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_base_url(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(invalid(var, value, "must start with http:// or https://"));
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

fn parse_number<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| invalid(var, value, &e.to_string()))
}

fn parse_secs<F>(lookup: &F, var: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) => {
            let secs = parse_number::<u64>(var, &v)?;
            if secs == 0 {
                return Err(invalid(var, &v, "must be positive"));
            }
            Ok(Duration::from_secs(secs))
        }
        None => Ok(default),
    }
}
