//! Environment configuration.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::host::HostCapabilities;

pub const DEFAULT_PROVIDER: &str = "mock";
pub const DEFAULT_RUN_TIMEOUT_SEC: u64 = 30;

#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Chat model provider id (`ASSIST_PROVIDER`).
    pub provider: String,
    pub workspace: Option<PathBuf>,
    /// File the host treats as "current" for shortcut applies.
    pub current_file: Option<PathBuf>,
    /// Log filter directives (`ASSIST_LOG`).
    pub log_filter: Option<String>,
    /// Upper bound for terminal commands run by a local host.
    pub run_timeout: Duration,
    pub request_clipboard: bool,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            provider: env_string_opt("ASSIST_PROVIDER")
                .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            workspace: env_string_opt("ASSIST_WORKSPACE").map(PathBuf::from),
            current_file: env_string_opt("ASSIST_CURRENT_FILE").map(PathBuf::from),
            log_filter: env_string_opt("ASSIST_LOG"),
            run_timeout: Duration::from_secs(
                env_u64_opt("ASSIST_RUN_TIMEOUT_SEC").unwrap_or(DEFAULT_RUN_TIMEOUT_SEC),
            ),
            request_clipboard: env_flag("ASSIST_REQUEST_CLIPBOARD"),
        }
    }

    pub fn host_capabilities(&self) -> HostCapabilities {
        HostCapabilities {
            request_clipboard: self.request_clipboard,
        }
    }
}

fn env_flag(key: &str) -> bool {
    env::var(key).map(|value| value == "1").unwrap_or(false)
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_u64_opt(key: &str) -> Option<u64> {
    let value = env_string_opt(key)?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(error) => {
            tracing::warn!(key, %value, %error, "ignoring non-numeric setting");
            None
        }
    }
}
