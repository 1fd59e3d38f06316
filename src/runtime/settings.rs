use crate::config::Settings;

/// Load settings, falling back to defaults on any failure.
///
/// Logging is configured from these settings, so a failure can't be logged
/// yet; it is returned for the caller to print and log once tracing is up.
pub fn load_settings() -> (Settings, Option<String>) {
    let loaded = Settings::load()
        .map_err(|e| format!("failed to load config, using defaults: {e}"))
        .and_then(|s| {
            s.validate()
                .map(|()| s)
                .map_err(|msg| format!("invalid config, using defaults: {msg}"))
        });

    match loaded {
        Ok(s) => (s, None),
        // Config is optional; failures should not prevent the app from starting.
        Err(warning) => (Settings::default(), Some(warning)),
    }
}
