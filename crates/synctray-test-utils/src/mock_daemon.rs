//! In-process stand-in for the Syncthing REST API.
//!
//! [`MockDaemon`] serves canned responses on an ephemeral loopback port and
//! records every request it sees, including when each handler started and
//! finished, so tests can assert both what was called and in which order.
//!
//! ```ignore
//! let daemon = MockDaemon::builder()
//!     .respond("POST", "/rest/system/restart", 500, "")
//!     .start()
//!     .await;
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use synctray_config::{ApiKey, DaemonEndpoint};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::debug;

/// API key the mock accepts. Anything else gets `403 Forbidden`.
pub const TEST_API_KEY: &str = "synctray-test-key";

/// One request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Value of the `X-API-Key` header, if any.
    pub api_key: Option<String>,
}

/// Handler lifecycle marker, in the order the mock observed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observed {
    Started { method: String, path: String },
    Finished { method: String, path: String },
}

impl Observed {
    pub fn started(method: &str, path: &str) -> Self {
        Observed::Started {
            method: method.to_string(),
            path: path.to_string(),
        }
    }

    pub fn finished(method: &str, path: &str) -> Self {
        Observed::Finished {
            method: method.to_string(),
            path: path.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct Route {
    status: u16,
    body: String,
    delay: Duration,
}

impl Default for Route {
    fn default() -> Self {
        Self {
            status: 404,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }
}

type RouteKey = (String, String);

#[derive(Default)]
struct Shared {
    routes: HashMap<RouteKey, Route>,
    requests: Mutex<Vec<RecordedRequest>>,
    timeline: Mutex<Vec<Observed>>,
}

/// Configures the routes of a [`MockDaemon`] before it starts.
pub struct MockDaemonBuilder {
    routes: HashMap<RouteKey, Route>,
}

impl MockDaemonBuilder {
    fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
        .version("v1.27.2", "linux", "amd64")
        .respond("POST", "/rest/system/restart", 200, r#"{"ok":"restarting"}"#)
        .respond("POST", "/rest/system/shutdown", 200, r#"{"ok":"shutting down"}"#)
    }

    /// Serve a well-formed version payload.
    pub fn version(self, version: &str, os: &str, arch: &str) -> Self {
        let body = serde_json::json!({
            "arch": arch,
            "longVersion": format!("syncthing {version} (go1.22 {os}-{arch})"),
            "os": os,
            "version": version,
        });
        self.respond("GET", "/rest/system/version", 200, &body.to_string())
    }

    /// Answer `method path` with `status` and `body`.
    pub fn respond(mut self, method: &str, path: &str, status: u16, body: &str) -> Self {
        let route = self.route_mut(method, path);
        route.status = status;
        route.body = body.to_string();
        self
    }

    /// Hold the response to `method path` for `delay`.
    pub fn delay(mut self, method: &str, path: &str, delay: Duration) -> Self {
        self.route_mut(method, path).delay = delay;
        self
    }

    fn route_mut(&mut self, method: &str, path: &str) -> &mut Route {
        self.routes
            .entry((method.to_uppercase(), path.to_string()))
            .or_default()
    }

    /// Bind an ephemeral loopback port and start serving.
    pub async fn start(self) -> MockDaemon {
        let shared = Arc::new(Shared {
            routes: self.routes,
            ..Default::default()
        });

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock daemon");
        let address = listener.local_addr().expect("mock daemon has no address");

        let app = axum::Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&shared));
        let server = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        debug!(%address, "mock daemon listening");

        MockDaemon {
            address,
            shared,
            server,
        }
    }
}

/// A running mock daemon. The server stops when this is dropped.
pub struct MockDaemon {
    address: SocketAddr,
    shared: Arc<Shared>,
    server: JoinHandle<()>,
}

impl MockDaemon {
    pub fn builder() -> MockDaemonBuilder {
        MockDaemonBuilder::new()
    }

    /// Start with the default routes: version, restart and shutdown all
    /// answer `200 OK`.
    pub async fn start() -> Self {
        Self::builder().start().await
    }

    /// `host:port`, as it would appear in the daemon's `<gui><address>`.
    pub fn address(&self) -> String {
        self.address.to_string()
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.address)
    }

    /// Endpoint carrying the accepted API key.
    pub fn endpoint(&self) -> DaemonEndpoint {
        DaemonEndpoint::new(self.base_url(), ApiKey::new(TEST_API_KEY))
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Handler start and finish markers, in the order they happened.
    pub fn timeline(&self) -> Vec<Observed> {
        self.shared
            .timeline
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl Drop for MockDaemon {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn handle(
    State(shared): State<Arc<Shared>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let method = method.as_str().to_string();
    let path = uri.path().to_string();
    let api_key = headers
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if let Ok(mut requests) = shared.requests.lock() {
        requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            api_key: api_key.clone(),
        });
    }
    record(&shared, Observed::started(&method, &path));

    let route = shared
        .routes
        .get(&(method.clone(), path.clone()))
        .cloned()
        .unwrap_or_default();
    if !route.delay.is_zero() {
        tokio::time::sleep(route.delay).await;
    }

    let response = if api_key.as_deref() != Some(TEST_API_KEY) {
        (StatusCode::FORBIDDEN, "Forbidden".to_string())
    } else {
        let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, route.body)
    };

    record(&shared, Observed::finished(&method, &path));
    response
}

fn record(shared: &Shared, observed: Observed) {
    if let Ok(mut timeline) = shared.timeline.lock() {
        timeline.push(observed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_default_routes() {
        crate::tracing_setup::init_test_tracing();
        let daemon = MockDaemon::start().await;
        let client = reqwest::Client::new();

        let resp = client
            .get(format!("{}/rest/system/version", daemon.base_url()))
            .header("X-API-Key", TEST_API_KEY)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let body: serde_json::Value = serde_json::from_str(&resp.text().await.unwrap()).unwrap();
        assert_eq!(body["version"], "v1.27.2");

        let resp = client
            .post(format!("{}/rest/system/unknown", daemon.base_url()))
            .header("X-API-Key", TEST_API_KEY)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 404);
    }

    #[tokio::test]
    async fn test_wrong_key_is_forbidden_but_recorded() {
        let daemon = MockDaemon::start().await;
        let resp = reqwest::Client::new()
            .post(format!("{}/rest/system/restart", daemon.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 403);
        assert_eq!(
            daemon.requests(),
            vec![RecordedRequest {
                method: "POST".to_string(),
                path: "/rest/system/restart".to_string(),
                api_key: None,
            }]
        );
    }

    #[test]
    fn test_respond_keeps_delay() {
        let builder = MockDaemon::builder()
            .delay("get", "/rest/system/version", Duration::from_millis(5))
            .respond("GET", "/rest/system/version", 503, "");
        let route = &builder.routes[&("GET".to_string(), "/rest/system/version".to_string())];
        assert_eq!(route.status, 503);
        assert_eq!(route.delay, Duration::from_millis(5));
    }
}
