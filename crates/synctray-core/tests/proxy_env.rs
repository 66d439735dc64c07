//! Runs in its own test binary: it sets proxy variables for the whole
//! process, which would otherwise leak into every other client test.

use synctray_core::ApiClient;
use synctray_test_utils::mock_daemon::MockDaemon;

const DEAD_PROXY: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn test_environment_proxy_is_bypassed() {
    // SAFETY: this is the only test in the binary and it sets the variables
    // before any client or server thread reads them.
    unsafe {
        for var in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
            std::env::set_var(var, DEAD_PROXY);
        }
    }

    let daemon = MockDaemon::builder()
        .version("v1.27.2", "linux", "amd64")
        .start()
        .await;

    let version = ApiClient::new(daemon.endpoint())
        .unwrap()
        .version()
        .await
        .unwrap();
    assert_eq!(version, "Syncthing v1.27.2 (linux/amd64)");
    assert_eq!(daemon.requests().len(), 1);
}
