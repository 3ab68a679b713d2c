#![forbid(unsafe_code)]

//! Binding engine configuration.
//!
//! [`BindingConfig`] is passed explicitly into the binding factory, which
//! hands it to every chained binding it builds. For ergonomics at the
//! composition root there is a thin process-wide default:
//!
//! - [`set_disable_indexed_value_warning`] flips an atomic flag, normally
//!   once at startup;
//! - `PATHBIND_DISABLE_INDEXED_VALUE_WARNING=1` does the same from the
//!   environment;
//! - [`BindingConfig::process_default`] combines both.
//!
//! Library code never reads the process-wide state directly; only
//! `process_default()` does.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

/// Environment variable that disables the indexed-value warning.
pub const DISABLE_INDEXED_VALUE_WARNING_ENV: &str = "PATHBIND_DISABLE_INDEXED_VALUE_WARNING";

static DISABLE_INDEXED_VALUE_WARNING: AtomicBool = AtomicBool::new(false);

/// Set the process-wide default for the indexed-value warning.
pub fn set_disable_indexed_value_warning(disable: bool) {
    DISABLE_INDEXED_VALUE_WARNING.store(disable, Ordering::Relaxed);
}

/// Configuration read at chained-binding construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "policy-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct BindingConfig {
    /// Suppress the "Value[] inside a notify-change binding" warning.
    pub disable_indexed_value_warning: bool,
}

#[inline]
fn env_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl BindingConfig {
    /// All diagnostics enabled.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            disable_indexed_value_warning: false,
        }
    }

    #[must_use]
    pub const fn with_indexed_value_warning_disabled(mut self, disable: bool) -> Self {
        self.disable_indexed_value_warning = disable;
        self
    }

    /// Build from a custom environment lookup.
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            disable_indexed_value_warning: get_env(DISABLE_INDEXED_VALUE_WARNING_ENV)
                .is_some_and(|v| env_flag(&v)),
        }
    }

    /// Build from the process environment (read once, then cached).
    #[must_use]
    pub fn from_env() -> Self {
        static FROM_ENV: OnceLock<BindingConfig> = OnceLock::new();
        *FROM_ENV.get_or_init(|| Self::from_env_with(|key| std::env::var(key).ok()))
    }

    /// Environment settings overlaid with [`set_disable_indexed_value_warning`].
    #[must_use]
    pub fn process_default() -> Self {
        let env = Self::from_env();
        Self {
            disable_indexed_value_warning: env.disable_indexed_value_warning
                || DISABLE_INDEXED_VALUE_WARNING.load(Ordering::Relaxed),
        }
    }

    /// Parse a TOML policy document.
    ///
    /// ```toml
    /// disable_indexed_value_warning = true
    /// ```
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Errors loading a [`BindingConfig`] policy.
#[cfg(feature = "policy-config")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
}

#[cfg(feature = "policy-config")]
impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "binding config parse error: {msg}"),
        }
    }
}

#[cfg(feature = "policy-config")]
impl std::error::Error for ConfigError {}
