use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, in `EnvFilter` syntax.
pub const LOG_ENV: &str = "GDEXT_LOG";

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Installs a stderr subscriber once per process.
///
/// If the host process (or a test harness) already installed a global
/// subscriber, that one is left in place.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
