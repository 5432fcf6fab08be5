//! Exporter Configuration
//!
//! Configuration is read from a single file (JSON, TOML or YAML, inferred from the
//! extension) and then overlaid with `SHELLY_EXPORTER__*` environment variables.
//! The key layout is flat and matches the legacy JSON format:
//!
//! ```json
//! {
//!   "listen_addr": "0.0.0.0",
//!   "port": 9100,
//!   "interval_seconds": 15,
//!   "shelly_plugs": [
//!     { "name": "desk", "host": "10.0.0.5", "username": "admin", "password": "${DESK_PW}" }
//!   ]
//! }
//! ```
//!
//! Device passwords go through `$VAR` / `${VAR}` expansion after loading so secrets can
//! live in the environment instead of the file.

use crate::error::{ExporterError, Result};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extensions whose format the `config` crate infers on its own
const KNOWN_EXTENSIONS: &[&str] = &["json", "json5", "toml", "yaml", "yml", "ini", "ron"];

/// Files probed, in order, when no explicit path is given
pub const FALLBACK_PATHS: &[&str] = &["/etc/shelly-prom/config.json", "config.json"];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_addr")]
    pub listen_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub shelly_plugs: Vec<Device>,
}

/// A single polled device
///
/// Built once at load time and never mutated afterwards. Fetch tasks receive it
/// through a shared `Arc<[Device]>`.
#[derive(Debug, Deserialize, Clone)]
pub struct Device {
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
}

impl Device {
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: &str) -> Self {
        self.username = Some(username.into());
        self.password = Some(SecretString::from(password));
        self
    }

    /// Basic auth pair, only when both parts are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().filter(|u| !u.is_empty())?;
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .filter(|p| !p.is_empty())?;
        Some((username, password))
    }
}

fn default_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9100
}

fn default_interval() -> u64 {
    15
}

fn default_timeout() -> u64 {
    5
}

impl Config {
    /// Load, expand and validate the configuration at `path`
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let path_str = path
            .to_str()
            .with_context(|| format!("Configuration path is not valid UTF-8: {:?}", path))?;

        // Unknown or missing extensions are read as JSON, like the legacy loader
        let file = if has_known_extension(path) {
            config::File::with_name(path_str)
        } else {
            config::File::new(path_str, config::FileFormat::Json)
        };

        let config = config::Config::builder()
            .add_source(file.required(true))
            .add_source(config::Environment::with_prefix("SHELLY_EXPORTER").separator("__"))
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        let mut config: Config = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.expand_passwords();
        config.validate()?;

        Ok(config)
    }

    /// Replace `$VAR` / `${VAR}` references in device passwords with their environment
    /// values and drop empty credentials
    pub fn expand_passwords(&mut self) {
        for device in &mut self.shelly_plugs {
            if let Some(password) = &device.password {
                let expanded = expand_env(password.expose_secret());
                device.password = if expanded.is_empty() {
                    None
                } else {
                    Some(SecretString::from(expanded))
                };
            }
            if device.username.as_deref() == Some("") {
                device.username = None;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_seconds == 0 {
            return Err(ExporterError::Config(
                "interval_seconds must be greater than zero".to_string(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(ExporterError::Config(
                "timeout_seconds must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for (index, device) in self.shelly_plugs.iter().enumerate() {
            if device.name.trim().is_empty() {
                return Err(ExporterError::Config(format!(
                    "shelly_plugs[{}]: name must not be empty",
                    index
                )));
            }
            if device.host.trim().is_empty() {
                return Err(ExporterError::Config(format!(
                    "shelly_plugs[{}] ({}): host must not be empty",
                    index, device.name
                )));
            }
            if !seen.insert((device.name.as_str(), device.host.as_str())) {
                return Err(ExporterError::Config(format!(
                    "duplicate device {} at {}",
                    device.name, device.host
                )));
            }
        }

        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Pick the configuration file to load
///
/// An explicit path wins. Otherwise the first existing entry of [`FALLBACK_PATHS`] is used.
pub fn resolve_path(explicit: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = explicit.filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    FALLBACK_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .context("no configuration file found")
}

fn has_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| KNOWN_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand `$VAR` and `${VAR}` from the process environment
///
/// Unset variables expand to an empty string.
pub fn expand_env(input: &str) -> String {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expand `$VAR` and `${VAR}` using `lookup`, with shell-style rules
///
/// - `$` followed by a shell special character (`*#$@!?-` or a digit) names that
///   one-character variable, so `$$` expands to the value of `$`
/// - `${}` and an unterminated `${` are dropped
/// - a `$` followed by anything else, or at the end of input, is kept verbatim
pub fn expand_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if after.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }

        let (name, width) = shell_name(after);
        match name {
            Some(name) => out.push_str(&lookup(name).unwrap_or_default()),
            None if width == 0 => out.push('$'),
            None => {}
        }
        rest = &after[width..];
    }

    out.push_str(rest);
    out
}

/// Variable name at the start of `s` (text after a `$`) and how many bytes it spans
///
/// `(None, n)` with `n > 0` is malformed syntax to drop; `(None, 0)` is no reference.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    let bytes = s.as_bytes();

    if bytes[0] == b'{' {
        if bytes.len() > 2 && is_special_var(bytes[1]) && bytes[2] == b'}' {
            return (Some(&s[1..2]), 3);
        }
        return match s[1..].find('}') {
            Some(0) => (None, 2),
            Some(end) => (Some(&s[1..end + 1]), end + 2),
            None => (None, 1),
        };
    }

    if is_special_var(bytes[0]) {
        return (Some(&s[..1]), 1);
    }

    let len = bytes
        .iter()
        .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
        .count();
    if len == 0 {
        (None, 0)
    } else {
        (Some(&s[..len]), len)
    }
}

fn is_special_var(b: u8) -> bool {
    matches!(b, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || b.is_ascii_digit()
}
