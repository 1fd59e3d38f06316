use std::{env, path::PathBuf};

use ::config::{Config, ConfigError, Environment, File};

use super::schema::Settings;

const APP_DIR: &str = "cadenza";
const ENV_PREFIX: &str = "CADENZA";
const CONFIG_PATH_VAR: &str = "CADENZA_CONFIG_PATH";

/// Configuration loading helpers.
///
/// Precedence, highest first: `CADENZA__SECTION__KEY` environment variables,
/// the optional TOML file, then struct defaults.
impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = resolve_config_path() {
            builder = builder.add_source(File::from(path.as_path()).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Reject values that would stall the player (zero-length steps and ticks).
    pub fn validate(&self) -> Result<(), String> {
        let checks = [
            (self.controls.seek_seconds == 0, "controls.seek_seconds"),
            (self.audio.poll_ms == 0, "audio.poll_ms"),
            (self.ui.tick_ms == 0, "ui.tick_ms"),
        ];
        match checks.iter().find(|(bad, _)| *bad) {
            Some((_, key)) => Err(format!("{key} must be >= 1")),
            None => Ok(()),
        }
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .or_else(|| default_config_dir().map(|d| d.join("config.toml")))
}

/// `$<xdg_var>/cadenza`, or `~/<home_fallback>/cadenza` when the variable is unset.
fn xdg_app_dir(xdg_var: &str, home_fallback: &[&str]) -> Option<PathBuf> {
    let base = env::var_os(xdg_var).map(PathBuf::from).or_else(|| {
        env::var_os("HOME").map(|home| {
            home_fallback
                .iter()
                .fold(PathBuf::from(home), |p, part| p.join(part))
        })
    })?;
    Some(base.join(APP_DIR))
}

/// `$XDG_CONFIG_HOME/cadenza` or `~/.config/cadenza`.
pub fn default_config_dir() -> Option<PathBuf> {
    xdg_app_dir("XDG_CONFIG_HOME", &[".config"])
}

/// `$XDG_STATE_HOME/cadenza` or `~/.local/state/cadenza`.
pub fn default_state_dir() -> Option<PathBuf> {
    xdg_app_dir("XDG_STATE_HOME", &[".local", "state"])
}
