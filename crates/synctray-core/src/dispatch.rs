//! Action dispatch loop.
//!
//! The [`EventLoop`] is the single consumer of user actions. It bootstraps
//! the API client once, then handles one [`ActionEvent`] at a time until
//! [`ActionEvent::Quit`]:
//!
//! ```text
//! Initializing ──▶ Idle ──recv──▶ Dispatching ──done──▶ Idle
//!                   │
//!                   └──Quit──▶ Terminated
//! ```
//!
//! Every daemon call is awaited inside the loop, so a slow daemon delays the
//! next queued action rather than running two calls at once. Failures are
//! turned into alerts here and nowhere else; the loop keeps running.

use std::fmt::Display;
use std::time::Duration;

use synctray_config::ConfigResolver;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::{ApiClient, ClientError, REQUEST_TIMEOUT};

/// A discrete user action raised by a frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionEvent {
    /// Open the daemon's web interface in the default browser.
    OpenUi,
    /// Restart the daemon.
    Restart,
    /// Shut the daemon down.
    Shutdown,
    /// Stop the dispatch loop and exit.
    Quit,
}

/// Lifecycle of the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Initializing,
    Idle,
    Dispatching,
    Terminated,
}

/// Sending half of the action queue. Frontends hold clones of this.
pub type ActionSender = mpsc::UnboundedSender<ActionEvent>;

/// Receiving half of the action queue, owned by the [`EventLoop`].
pub type ActionReceiver = mpsc::UnboundedReceiver<ActionEvent>;

/// Create the action queue. Sending never blocks, so frontends may fire
/// actions from any thread while a daemon call is in flight.
pub fn action_channel() -> (ActionSender, ActionReceiver) {
    mpsc::unbounded_channel()
}

/// What the dispatch loop needs from the UI.
pub trait Frontend: Send {
    /// Replace the version label (called at most once).
    fn set_version_label(&mut self, label: &str);

    /// Show an error to the user.
    fn alert(&mut self, message: &str);

    /// Tear the UI down. Called exactly once, when the loop terminates.
    fn quit(&mut self);
}

/// Launches URLs with the OS default handler.
pub trait UrlOpener: Send {
    fn open_url(&self, url: &str) -> std::io::Result<()>;
}

/// [`UrlOpener`] backed by the desktop's default browser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl UrlOpener for SystemOpener {
    fn open_url(&self, url: &str) -> std::io::Result<()> {
        open::that_detached(url)
    }
}

/// Failure of a single dispatched action.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Bootstrap could not produce an endpoint, so no client exists.
    #[error("no daemon endpoint available: {0}")]
    NoEndpoint(String),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("{0}")]
    Open(#[source] std::io::Error),
}

enum Connection {
    Pending,
    Ready(ApiClient),
    Unavailable(String),
}

/// The single owner of the API client and the action queue.
pub struct EventLoop<F, O> {
    resolver: ConfigResolver,
    frontend: F,
    opener: O,
    actions: ActionReceiver,
    request_timeout: Duration,
    connection: Connection,
    state: LoopState,
}

impl<F: Frontend, O: UrlOpener> EventLoop<F, O> {
    pub fn new(resolver: ConfigResolver, frontend: F, opener: O, actions: ActionReceiver) -> Self {
        Self {
            resolver,
            frontend,
            opener,
            actions,
            request_timeout: REQUEST_TIMEOUT,
            connection: Connection::Pending,
            state: LoopState::Initializing,
        }
    }

    /// Override the timeout applied to every daemon request.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    /// Bootstrap, then dispatch actions until `Quit` (or until every sender
    /// is gone). Returns immediately if the loop has already run.
    pub async fn run(&mut self) {
        if self.state != LoopState::Initializing {
            return;
        }

        self.initialize().await;
        self.state = LoopState::Idle;
        debug!(state = ?self.state, "dispatch loop ready");

        while let Some(event) = self.actions.recv().await {
            if event == ActionEvent::Quit {
                info!("quit requested");
                self.terminate();
                return;
            }

            self.state = LoopState::Dispatching;
            debug!(?event, "dispatching action");
            self.dispatch(event).await;
            self.state = LoopState::Idle;
        }

        warn!("all action senders dropped, stopping dispatch loop");
        self.terminate();
    }

    async fn initialize(&mut self) {
        self.connection = match self.resolver.resolve().await {
            Ok(endpoint) => match ApiClient::with_timeout(endpoint, self.request_timeout) {
                Ok(client) => {
                    info!(base_url = client.base_url(), "daemon endpoint resolved");
                    Connection::Ready(client)
                }
                Err(e) => {
                    self.report("Unable to create Syncthing API client", &e);
                    Connection::Unavailable(e.to_string())
                }
            },
            Err(e) => {
                self.report("Unable to fetch URL and API key from config", &e);
                Connection::Unavailable(e.to_string())
            }
        };

        match self.fetch_version().await {
            Ok(label) => {
                info!(version = %label, "daemon version");
                self.frontend.set_version_label(&label);
            }
            Err(e) => self.report("Unable to fetch Syncthing version", &e),
        }
    }

    async fn fetch_version(&self) -> Result<String, DispatchError> {
        Ok(self.client()?.version().await?)
    }

    async fn dispatch(&mut self, event: ActionEvent) {
        let (context, result) = match event {
            ActionEvent::OpenUi => ("Unable to open web interface", self.open_ui()),
            ActionEvent::Restart => ("Unable to restart Syncthing", self.restart().await),
            ActionEvent::Shutdown => ("Unable to shutdown Syncthing", self.shutdown().await),
            ActionEvent::Quit => return,
        };

        match result {
            Ok(()) => debug!(?event, "action completed"),
            Err(e) => self.report(context, &e),
        }
    }

    fn open_ui(&self) -> Result<(), DispatchError> {
        let url = self.client()?.base_url();
        self.opener.open_url(url).map_err(DispatchError::Open)
    }

    async fn restart(&self) -> Result<(), DispatchError> {
        Ok(self.client()?.restart().await?)
    }

    async fn shutdown(&self) -> Result<(), DispatchError> {
        Ok(self.client()?.shutdown().await?)
    }

    fn client(&self) -> Result<&ApiClient, DispatchError> {
        match &self.connection {
            Connection::Ready(client) => Ok(client),
            Connection::Unavailable(reason) => Err(DispatchError::NoEndpoint(reason.clone())),
            Connection::Pending => Err(DispatchError::NoEndpoint(
                "configuration not loaded yet".to_string(),
            )),
        }
    }

    fn report(&mut self, context: &str, err: &dyn Display) {
        error!(error = %err, "{context}");
        self.frontend.alert(&format!("{context}: {err}"));
    }

    fn terminate(&mut self) {
        self.state = LoopState::Terminated;
        self.frontend.quit();
    }
}
