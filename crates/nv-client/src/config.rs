//! Issuance service client configuration.
//!
//! All settings are supplied by the caller: endpoint, caller OIN, TLS
//! material, first-level salt, and batch polling cadence. Nothing is
//! hardcoded in the client logic. Load from the environment with
//! [`ClientConfig::from_env`] or construct explicitly.

use std::path::PathBuf;
use std::time::Duration;

use nv_crypto::KdfParams;
use url::Url;
use zeroize::Zeroizing;

/// Default number of `retrieveBatch` attempts.
pub const DEFAULT_POLL_ATTEMPTS: u32 = 10;

/// Default sleep before each `retrieveBatch` attempt.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(21);

/// Configuration for connecting to the issuance service.
///
/// Custom `Debug` implementation redacts `first_level_salt`.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the service. Operations are posted to `{endpoint_url}/{operation}`.
    pub endpoint_url: Url,
    /// Organisation identification number of the calling instance, sent in
    /// the addressing header of every request.
    pub instance_oin: String,
    /// Base64 first-level salt for HPgn derivation.
    pub first_level_salt: Zeroizing<String>,
    /// Scrypt cost parameters. Must match the service.
    pub kdf_params: KdfParams,
    pub tls: TlsConfig,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub batch_poll: BatchPollConfig,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("instance_oin", &self.instance_oin)
            .field("first_level_salt", &"[REDACTED]")
            .field("kdf_params", &self.kdf_params)
            .field("tls", &self.tls)
            .field("timeout_secs", &self.timeout_secs)
            .field("batch_poll", &self.batch_poll)
            .finish()
    }
}

/// Server certificate validation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CertificateVerification {
    /// Validate the server chain against the trust roots.
    #[default]
    Strict,
    /// Accept any server certificate. Test environments only.
    DangerAcceptInvalid,
}

/// TLS material. PEM files are read when the transport is built.
#[derive(Debug, Clone, Default)]
pub struct TlsConfig {
    /// PEM file holding the client certificate chain and its private key.
    pub client_identity_pem: Option<PathBuf>,
    /// Additional trusted root certificate (PEM).
    pub ca_certificate_pem: Option<PathBuf>,
    pub verification: CertificateVerification,
}

/// Bounded polling of batch results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPollConfig {
    /// Maximum number of `retrieveBatch` calls.
    pub attempts: u32,
    /// Fixed sleep before each call.
    pub interval: Duration,
}

impl Default for BatchPollConfig {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_POLL_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl BatchPollConfig {
    /// # Errors
    ///
    /// `ConfigError::InvalidValue` if `attempts` is zero.
    pub fn new(attempts: u32, interval: Duration) -> Result<Self, ConfigError> {
        if attempts == 0 {
            return Err(ConfigError::InvalidValue {
                var: "attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self { attempts, interval })
    }

    /// Worst-case client-side wait before a timeout is reported.
    pub fn max_wait(&self) -> Duration {
        self.interval.saturating_mul(self.attempts)
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `NV_ENDPOINT_URL` (required)
    /// - `NV_INSTANCE_OIN` (required)
    /// - `NV_FIRST_LEVEL_SALT` (required, base64)
    /// - `NV_KDF_PRESET`: `eckid` (default) or `schoolid-legacy`
    /// - `NV_CLIENT_IDENTITY_PEM`, `NV_CA_CERTIFICATE_PEM` (optional paths)
    /// - `NV_TLS_ACCEPT_INVALID_CERTS`: `true` disables server validation
    /// - `NV_TIMEOUT_SECS` (default: 30)
    /// - `NV_BATCH_POLL_ATTEMPTS` (default: 10)
    /// - `NV_BATCH_POLL_INTERVAL_SECS` (default: 21)
    pub fn from_env() -> Result<Self, ConfigError> {
        let instance_oin = required("NV_INSTANCE_OIN")?;
        let first_level_salt = Zeroizing::new(required("NV_FIRST_LEVEL_SALT")?);

        let kdf_params = match std::env::var("NV_KDF_PRESET").ok().as_deref() {
            None | Some("eckid") => KdfParams::ECK_ID,
            Some("schoolid-legacy") => KdfParams::SCHOOL_ID_LEGACY,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    var: "NV_KDF_PRESET".into(),
                    reason: format!("unknown preset {other:?}"),
                })
            }
        };

        let verification = if env_flag("NV_TLS_ACCEPT_INVALID_CERTS") {
            CertificateVerification::DangerAcceptInvalid
        } else {
            CertificateVerification::Strict
        };

        let batch_poll = BatchPollConfig::new(
            env_parse("NV_BATCH_POLL_ATTEMPTS", DEFAULT_POLL_ATTEMPTS)?,
            Duration::from_secs(env_parse(
                "NV_BATCH_POLL_INTERVAL_SECS",
                DEFAULT_POLL_INTERVAL.as_secs(),
            )?),
        )?;

        Ok(Self {
            endpoint_url: env_url("NV_ENDPOINT_URL")?,
            instance_oin,
            first_level_salt,
            kdf_params,
            tls: TlsConfig {
                client_identity_pem: std::env::var_os("NV_CLIENT_IDENTITY_PEM").map(PathBuf::from),
                ca_certificate_pem: std::env::var_os("NV_CA_CERTIFICATE_PEM").map(PathBuf::from),
                verification,
            },
            timeout_secs: env_parse("NV_TIMEOUT_SECS", 30)?,
            batch_poll,
        })
    }

    /// Create a configuration pointing at a local plain-HTTP service (for
    /// testing). Polling is shortened to 10 attempts of 10 ms.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if the localhost URL cannot be parsed.
    pub fn local_mock(port: u16, instance_oin: &str, salt_b64: &str) -> Result<Self, ConfigError> {
        let endpoint_url = Url::parse(&format!("http://127.0.0.1:{port}"))
            .map_err(|e| ConfigError::InvalidUrl("localhost".to_string(), e.to_string()))?;
        Ok(Self {
            endpoint_url,
            instance_oin: instance_oin.to_string(),
            first_level_salt: Zeroizing::new(salt_b64.to_string()),
            kdf_params: KdfParams::ECK_ID,
            tls: TlsConfig::default(),
            timeout_secs: 5,
            batch_poll: BatchPollConfig {
                attempts: DEFAULT_POLL_ATTEMPTS,
                interval: Duration::from_millis(10),
            },
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

fn env_url(var: &'static str) -> Result<Url, ConfigError> {
    let raw = required(var)?;
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_parse<T>(var: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn env_flag(var: &str) -> bool {
    std::env::var(var)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
    #[error("TLS material {path}: {reason}")]
    Tls { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_mock_builds_valid_config() {
        let cfg = ClientConfig::local_mock(9000, "00000001234567890000", "c2FsdA==").unwrap();
        assert_eq!(cfg.endpoint_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.instance_oin, "00000001234567890000");
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.tls.verification, CertificateVerification::Strict);
        assert_eq!(cfg.batch_poll.attempts, 10);
    }

    #[test]
    fn debug_redacts_salt() {
        let cfg = ClientConfig::local_mock(9000, "oin", "c2VjcmV0LXNhbHQ=").unwrap();
        let dbg = format!("{cfg:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains("c2VjcmV0LXNhbHQ="));
    }

    #[test]
    fn default_poll_is_ten_attempts_of_21_seconds() {
        let poll = BatchPollConfig::default();
        assert_eq!(poll.attempts, 10);
        assert_eq!(poll.interval, Duration::from_secs(21));
        assert_eq!(poll.max_wait(), Duration::from_secs(210));
    }

    #[test]
    fn poll_config_rejects_zero_attempts() {
        assert!(matches!(
            BatchPollConfig::new(0, Duration::from_secs(1)),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn verification_defaults_to_strict() {
        assert_eq!(CertificateVerification::default(), CertificateVerification::Strict);
        assert_eq!(TlsConfig::default().verification, CertificateVerification::Strict);
    }

    #[test]
    fn env_url_is_required() {
        assert!(matches!(
            env_url("NONEXISTENT_VAR_NV_12345"),
            Err(ConfigError::MissingVar("NONEXISTENT_VAR_NV_12345"))
        ));
    }

    #[test]
    fn env_url_rejects_invalid_url() {
        std::env::set_var("TEST_BAD_URL_NV", "not a url");
        let result = env_url("TEST_BAD_URL_NV");
        std::env::remove_var("TEST_BAD_URL_NV");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(..))));
    }

    #[test]
    fn env_url_parses_endpoint_with_path() {
        std::env::set_var("TEST_GOOD_URL_NV", "https://service.test/eckid/v1");
        let result = env_url("TEST_GOOD_URL_NV");
        std::env::remove_var("TEST_GOOD_URL_NV");
        assert_eq!(result.unwrap().path(), "/eckid/v1");
    }

    #[test]
    fn env_parse_reports_variable_name() {
        std::env::set_var("TEST_BAD_NUMBER_NV", "ten");
        let result: Result<u32, _> = env_parse("TEST_BAD_NUMBER_NV", 10);
        std::env::remove_var("TEST_BAD_NUMBER_NV");
        match result {
            Err(ConfigError::InvalidValue { var, .. }) => assert_eq!(var, "TEST_BAD_NUMBER_NV"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn env_flag_accepts_truthy_values() {
        std::env::set_var("TEST_FLAG_NV", "TRUE");
        assert!(env_flag("TEST_FLAG_NV"));
        std::env::set_var("TEST_FLAG_NV", "no");
        assert!(!env_flag("TEST_FLAG_NV"));
        std::env::remove_var("TEST_FLAG_NV");
        assert!(!env_flag("TEST_FLAG_NV"));
    }

    #[test]
    fn required_rejects_blank() {
        std::env::set_var("TEST_REQUIRED_NV", "  ");
        let result = required("TEST_REQUIRED_NV");
        std::env::remove_var("TEST_REQUIRED_NV");
        assert!(matches!(result, Err(ConfigError::MissingVar("TEST_REQUIRED_NV"))));
    }
}
