//! Tracing initialisation for tests that want log output without `test-log`.
//!
//! The subscriber is installed at most once per process, so every test may
//! call [`init_test_tracing`].

use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber honouring `RUST_LOG` (default `debug`
/// for the synctray crates, `warn` for everything else).
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,synctray=debug,synctray_core=debug")),
        )
        .with_test_writer()
        .try_init();
}
