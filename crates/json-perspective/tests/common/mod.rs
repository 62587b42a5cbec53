use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static LOGGING: Once = Once::new();

/// Install a test subscriber once per binary; `RUST_LOG` controls verbosity.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_test_writer().with_target(true))
            .with(filter)
            .try_init();
    });
}
