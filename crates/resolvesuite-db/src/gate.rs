//! Single-flight connection gate.
//!
//! State machine: `Unconnected -> Connecting -> {Ready | Failed}`. `Ready` is final for
//! the process lifetime. `Failed` is not: the next call that arrives after a failed
//! attempt has resolved makes a fresh attempt, while calls that were already waiting on
//! the failed attempt share its error instead of retrying.
//!
//! Each attempt runs on its own spawned task and callers only wait for it, so a caller
//! that is dropped mid-connect (client disconnect, aborted warm-up) neither cancels the
//! attempt nor lets a second one start.

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use resolvesuite_core::AppError;
use tokio::sync::watch;

/// Connection establishment errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    #[error("database is not configured (DATABASE_URL is unset)")]
    NotConfigured,

    #[error("failed to connect to database: {0}")]
    Connect(String),
}

impl From<ConnectionError> for AppError {
    fn from(err: ConnectionError) -> Self {
        AppError::Connection(err.to_string())
    }
}

/// Lifecycle of the shared connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Unconnected,
    Connecting,
    Ready,
    Failed(ConnectionError),
}

impl ConnectionState {
    /// Short label used by health reporting.
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionState::Unconnected => "unconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Failed(_) => "failed",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ConnectionState::Ready)
    }
}

/// Performs one connection handshake.
#[async_trait]
pub trait Connector<T>: Send + Sync {
    async fn connect(&self) -> Result<T, ConnectionError>;
}

/// Outcome of the most recent resolved attempt.
#[derive(Debug, Clone, Default)]
struct Resolved {
    attempts: u64,
    last_error: Option<ConnectionError>,
}

struct Inner<T> {
    connector: Arc<dyn Connector<T>>,
    connection: OnceLock<T>,
    state: watch::Sender<ConnectionState>,
    resolved: watch::Sender<Resolved>,
    // True while a spawned attempt has not yet published its outcome.
    in_flight: Mutex<bool>,
}

/// Owns the shared connection and guarantees a single in-flight attempt.
pub struct ConnectionGate<T> {
    inner: Arc<Inner<T>>,
}

impl<T> ConnectionGate<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(connector: Arc<dyn Connector<T>>) -> Self {
        let (state, _) = watch::channel(ConnectionState::Unconnected);
        let (resolved, _) = watch::channel(Resolved::default());
        Self {
            inner: Arc::new(Inner {
                connector,
                connection: OnceLock::new(),
                state,
                resolved,
                in_flight: Mutex::new(false),
            }),
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> ConnectionState {
        self.inner.state.borrow().clone()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<ConnectionState> {
        self.inner.state.subscribe()
    }

    /// The established connection, if the gate is ready.
    pub fn connection(&self) -> Option<&T> {
        self.inner.connection.get()
    }

    /// Number of connection attempts that have resolved so far.
    pub fn attempts(&self) -> u64 {
        self.inner.resolved.borrow().attempts
    }

    /// Start an attempt unless the gate is ready or one is already running. Returns
    /// without waiting for the outcome.
    pub fn begin(&self) {
        if self.inner.connection.get().is_none() {
            self.launch();
        }
    }

    /// Make sure the connection is established, connecting if needed.
    ///
    /// Returns immediately without I/O once the gate is ready. Overlapping calls while an
    /// attempt is in flight wait for it and observe its outcome.
    pub async fn ensure_ready(&self) -> Result<&T, ConnectionError> {
        if let Some(connection) = self.inner.connection.get() {
            return Ok(connection);
        }

        let mut resolved = self.inner.resolved.subscribe();
        let target = self.launch();

        let outcome = resolved
            .wait_for(|r| r.attempts >= target)
            .await
            .map(|r| r.last_error.clone())
            .map_err(|_| ConnectionError::Connect("connection gate closed".to_string()))?;

        match self.inner.connection.get() {
            Some(connection) => Ok(connection),
            None => Err(outcome.unwrap_or_else(|| {
                ConnectionError::Connect("connection attempt did not complete".to_string())
            })),
        }
    }

    /// Spawn an attempt if none is running and return the attempt number to wait for.
    fn launch(&self) -> u64 {
        let mut in_flight = match self.inner.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let resolved = self.inner.resolved.borrow().attempts;

        if self.inner.connection.get().is_some() {
            return resolved;
        }
        let next = resolved + 1;
        if *in_flight {
            tracing::debug!(attempt = next, "Joining the connection attempt in flight");
            return next;
        }

        *in_flight = true;
        self.inner.state.send_replace(ConnectionState::Connecting);
        tracing::info!(attempt = next, "Connecting to database...");

        let inner = self.inner.clone();
        tokio::spawn(async move { inner.run_attempt().await });
        next
    }
}

impl<T> Inner<T>
where
    T: Send + Sync + 'static,
{
    async fn run_attempt(&self) {
        let connector = self.connector.clone();
        let outcome = match tokio::spawn(async move { connector.connect().await }).await {
            Ok(outcome) => outcome,
            Err(e) => Err(ConnectionError::Connect(format!(
                "connection attempt aborted: {}",
                e
            ))),
        };

        let last_error = match outcome {
            Ok(connection) => {
                let _ = self.connection.set(connection);
                self.state.send_replace(ConnectionState::Ready);
                tracing::info!("Database connected successfully");
                None
            }
            Err(err) => {
                tracing::error!(
                    error = %err,
                    "Database connection failed; continuing without a ready backend"
                );
                self.state.send_replace(ConnectionState::Failed(err.clone()));
                Some(err)
            }
        };

        let mut in_flight = match self.in_flight.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *in_flight = false;
        self.resolved.send_modify(|r| {
            r.attempts += 1;
            r.last_error = last_error;
        });
    }
}
