//! Application settings loaded via OrthoConfig.
//!
//! Values layer CLI flags over `SCOREBOOK_*` environment variables over an
//! optional configuration file. Session settings are validated against the
//! build mode: release builds refuse ephemeral or short session keys.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{DEFAULT_EMAIL_MAX_LENGTH, EmailPolicy};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this length.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate defaults and emit warnings.
    Debug,
    /// Release builds require a real session key.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }

    fn session_key_min_len(self) -> usize {
        match self {
            Self::Debug => SESSION_KEY_DERIVE_MIN_LEN,
            Self::Release => SESSION_KEY_MIN_LEN,
        }
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// The bind host is not an IP address.
    #[error("invalid bind host '{host}'")]
    InvalidHost { host: String },
    /// The same-site policy is not recognised.
    #[error("invalid same_site '{value}'; expected {expected}")]
    InvalidSameSite {
        value: String,
        expected: &'static str,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("same_site=None requires cookie_secure=true")]
    InsecureSameSiteNone,
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file is too short for the build mode.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Configuration values for the HTTP server, store and validation rules.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCOREBOOK")]
pub struct AppSettings {
    /// Interface to bind; defaults to every IPv4 interface.
    pub host: Option<String>,
    /// Port to bind; defaults to 8080.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it records live in process memory.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_timeout_secs: Option<u64>,
    /// Maximum email length in characters.
    pub email_max_length: Option<usize>,
    /// Path to the session signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`; defaults to `true`.
    pub cookie_secure: Option<bool>,
    /// `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Allow a generated session key when the key file is unreadable;
    /// defaults to `false`.
    pub allow_ephemeral_key: Option<bool>,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Whether the session cookie carries the `Secure` attribute.
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    fn allow_ephemeral_key(&self) -> bool {
        self.allow_ephemeral_key.unwrap_or(false)
    }

    /// Email validation rule applied to user writes.
    pub fn email_policy(&self) -> EmailPolicy {
        EmailPolicy::new(
            true,
            self.email_max_length.unwrap_or(DEFAULT_EMAIL_MAX_LENGTH),
        )
    }

    /// Pool configuration for `database_url`, when one is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref()?;
        let mut config = PoolConfig::new(url);
        if let Some(size) = self.pool_max_size {
            config = config.with_max_size(size);
        }
        if let Some(secs) = self.pool_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }

    /// Cookie `SameSite` policy; debug builds default to `Lax`, release to
    /// `Strict`.
    pub fn same_site(&self, mode: BuildMode) -> Result<SameSite, SettingsError> {
        let Some(value) = self.same_site.as_deref() else {
            return Ok(if mode.is_debug() {
                SameSite::Lax
            } else {
                SameSite::Strict
            });
        };
        match value.to_ascii_lowercase().as_str() {
            "lax" => Ok(SameSite::Lax),
            "strict" => Ok(SameSite::Strict),
            "none" if self.cookie_secure() => Ok(SameSite::None),
            "none" if mode.is_debug() => {
                warn!("same_site=None without a secure cookie; browsers may reject it");
                Ok(SameSite::None)
            }
            "none" => Err(SettingsError::InsecureSameSiteNone),
            _ => Err(SettingsError::InvalidSameSite {
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            }),
        }
    }

    /// Load the session signing key.
    ///
    /// Release builds need at least 64 bytes of key material; debug builds
    /// need 32.
    ///
    /// Falls back to a generated key in debug builds or when
    /// `allow_ephemeral_key` is set; flash messages then do not survive a
    /// restart.
    pub fn session_key(&self, mode: BuildMode) -> Result<Key, SettingsError> {
        let path = self
            .session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));

        match std::fs::read(&path) {
            Ok(bytes) => {
                let length = bytes.len();
                let min_len = mode.session_key_min_len();
                if length < min_len {
                    return Err(SettingsError::KeyTooShort {
                        path,
                        length,
                        min_len,
                    });
                }
                Ok(Key::derive_from(&bytes))
            }
            Err(error) if mode.is_debug() || self.allow_ephemeral_key() => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            }
            Err(source) => Err(SettingsError::KeyRead { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "SCOREBOOK_HOST",
        "SCOREBOOK_PORT",
        "SCOREBOOK_DATABASE_URL",
        "SCOREBOOK_POOL_MAX_SIZE",
        "SCOREBOOK_POOL_TIMEOUT_SECS",
        "SCOREBOOK_EMAIL_MAX_LENGTH",
        "SCOREBOOK_SESSION_KEY_FILE",
        "SCOREBOOK_COOKIE_SECURE",
        "SCOREBOOK_SAME_SITE",
        "SCOREBOOK_ALLOW_EPHEMERAL_KEY",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("scorebook")]).expect("config should load")
    }

    fn cleared() -> Vec<(&'static str, Option<String>)> {
        VARS.iter().map(|name| (*name, None)).collect()
    }

    fn with(overrides: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        let mut vars = cleared();
        for (name, value) in overrides {
            vars.retain(|(existing, _)| existing != name);
            vars.push((*name, Some((*value).to_owned())));
        }
        vars
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(cleared());

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal addr")
        );
        assert!(settings.cookie_secure());
        assert!(!settings.allow_ephemeral_key());
        assert!(settings.pool_config().is_none());
        assert_eq!(
            settings.email_policy().max_length(),
            DEFAULT_EMAIL_MAX_LENGTH
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(with(&[
            ("SCOREBOOK_HOST", "127.0.0.1"),
            ("SCOREBOOK_PORT", "9000"),
            ("SCOREBOOK_DATABASE_URL", "postgres://localhost/scorebook"),
            ("SCOREBOOK_POOL_MAX_SIZE", "4"),
            ("SCOREBOOK_POOL_TIMEOUT_SECS", "5"),
            ("SCOREBOOK_EMAIL_MAX_LENGTH", "64"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("addr"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("literal addr")
        );
        let pool = settings.pool_config().expect("pool config");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
        assert_eq!(settings.email_policy().max_length(), 64);
    }

    #[rstest]
    fn invalid_host_is_reported() {
        let _guard = lock_env(with(&[("SCOREBOOK_HOST", "not a host")]));
        let err = load_from_empty_args().bind_addr().expect_err("bad host");
        assert!(matches!(err, SettingsError::InvalidHost { .. }));
    }

    #[rstest]
    #[case(None, BuildMode::Debug, SameSite::Lax)]
    #[case(None, BuildMode::Release, SameSite::Strict)]
    #[case(Some("strict"), BuildMode::Debug, SameSite::Strict)]
    #[case(Some("None"), BuildMode::Release, SameSite::None)]
    fn same_site_resolves(
        #[case] raw: Option<&str>,
        #[case] mode: BuildMode,
        #[case] expected: SameSite,
    ) {
        let _guard = lock_env(cleared());
        let mut settings = load_from_empty_args();
        settings.same_site = raw.map(str::to_owned);
        assert_eq!(settings.same_site(mode).expect("valid policy"), expected);
    }

    #[rstest]
    fn insecure_same_site_none_is_rejected_in_release() {
        let _guard = lock_env(cleared());
        let mut settings = load_from_empty_args();
        settings.cookie_secure = Some(false);
        settings.same_site = Some("none".to_owned());
        assert!(matches!(
            settings.same_site(BuildMode::Release),
            Err(SettingsError::InsecureSameSiteNone)
        ));
    }

    #[rstest]
    #[case(BuildMode::Debug, false, true)]
    #[case(BuildMode::Release, true, true)]
    #[case(BuildMode::Release, false, false)]
    fn missing_key_file_falls_back_only_when_allowed(
        #[case] mode: BuildMode,
        #[case] allow_ephemeral: bool,
        #[case] expect_key: bool,
    ) {
        let _guard = lock_env(cleared());
        let mut settings = load_from_empty_args();
        settings.session_key_file = Some(PathBuf::from("/nonexistent/scorebook/session_key"));
        settings.allow_ephemeral_key = Some(allow_ephemeral);
        assert_eq!(settings.session_key(mode).is_ok(), expect_key);
    }

    #[rstest]
    #[case(5, BuildMode::Debug, Some(32))]
    #[case(5, BuildMode::Release, Some(64))]
    #[case(40, BuildMode::Debug, None)]
    #[case(40, BuildMode::Release, Some(64))]
    #[case(64, BuildMode::Release, None)]
    fn key_length_is_checked_in_every_mode(
        #[case] length: usize,
        #[case] mode: BuildMode,
        #[case] rejected_below: Option<usize>,
    ) {
        let _guard = lock_env(cleared());
        let path = std::env::temp_dir().join(format!("scorebook_session_key_{length}_{mode:?}"));
        std::fs::write(&path, vec![7_u8; length]).expect("write key");

        let mut settings = load_from_empty_args();
        settings.session_key_file = Some(path.clone());
        let outcome = settings.session_key(mode);
        std::fs::remove_file(&path).expect("remove key");

        match rejected_below {
            Some(min) => assert!(matches!(
                outcome.err(),
                Some(SettingsError::KeyTooShort { length: got, min_len, .. })
                    if got == length && min_len == min
            )),
            None => assert!(outcome.is_ok()),
        }
    }

    #[rstest]
    fn cookie_secure_can_be_disabled_explicitly() {
        let _guard = lock_env(with(&[("SCOREBOOK_COOKIE_SECURE", "false")]));
        assert!(!load_from_empty_args().cookie_secure());
    }
}
