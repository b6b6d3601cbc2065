use tracing_subscriber::EnvFilter;

/// Filter for the dashboard log output. `RUST_LOG` only applies with debug
/// logging enabled in the settings.
pub fn env_filter(debug: bool) -> EnvFilter {
    if !debug {
        return EnvFilter::new("info");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
}

/// Install the global subscriber. Later calls leave the first one in place.
pub fn init(debug: bool) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(debug))
        .with_target(false)
        .try_init()
        .is_ok();
    if installed {
        let debug_enabled = debug;
        tracing::debug!(debug = debug_enabled, "logging initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_filter_ignores_environment() {
        std::env::set_var("RUST_LOG", "trace");
        assert_eq!(env_filter(false).to_string(), "info");
    }

    #[test]
    fn init_installs_global_subscriber() {
        init(false);
        init(true);
        assert!(tracing::dispatcher::has_been_set());
    }
}
