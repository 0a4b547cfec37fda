//! Session lifecycle: connect, bind, watch the link, reconnect.
//!
//! ```text
//! Disconnected -> Connecting -> Negotiating -> Bound
//!      ^              |              |           |
//!      +--------------+--------------+-----------+   (close; reconnect after delay)
//! ```
//!
//! The manager is the only writer of the current session. Everyone else
//! reads it through a [`SessionHandle`], which sees `Some` only while the
//! session is bound.

use crate::client::{DefaultClient, SessionEvent, SessionEvents, SmppClient, SmppResult};
use crate::datatypes::CommandId;
use crate::gateway::SessionConfig;
use crate::gateway::negotiation::{BindNegotiator, NegotiationOutcome};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, info, warn};

/// Upper bound on the unbind handshake during teardown
const UNBIND_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens transport connections. The seam between the lifecycle and the
/// wire; tests substitute a scripted connector.
pub trait Connector: Send + Sync + 'static {
    type Client: SmppClient;

    fn connect(
        &self,
        config: &SessionConfig,
    ) -> impl Future<Output = SmppResult<(Self::Client, SessionEvents)>> + Send;
}

/// Connects over TCP with [`DefaultClient`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

impl Connector for TcpConnector {
    type Client = DefaultClient;

    async fn connect(&self, config: &SessionConfig) -> SmppResult<(DefaultClient, SessionEvents)> {
        DefaultClient::connect(config.address(), config.keep_alive()).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Disconnected,
    Connecting,
    Negotiating,
    Bound,
}

impl SessionState {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionState::Disconnected => "disconnected",
            SessionState::Connecting => "connecting",
            SessionState::Negotiating => "negotiating",
            SessionState::Bound => "bound",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of the manager's current session and state
#[derive(Debug, Clone)]
pub struct SessionHandle<C> {
    session: watch::Receiver<Option<C>>,
    state: watch::Receiver<SessionState>,
}

impl<C: Clone> SessionHandle<C> {
    /// The bound session, if there is one right now
    pub fn current(&self) -> Option<C> {
        self.session.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// A receiver for state changes alone, independent of the client type
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Wait until the manager reaches `state`
    pub async fn wait_for(&mut self, state: SessionState) -> bool {
        self.state.wait_for(|s| *s == state).await.is_ok()
    }
}

/// Owns the single SMSC connection and keeps it bound.
pub struct SessionManager<K: Connector> {
    config: Arc<SessionConfig>,
    connector: K,
    negotiator: BindNegotiator,
    state: watch::Sender<SessionState>,
    session: watch::Sender<Option<K::Client>>,
    /// Open connection, bound or not
    active: Option<K::Client>,
}

impl<K: Connector> SessionManager<K> {
    pub fn new(config: Arc<SessionConfig>, connector: K) -> Self {
        let (state, _) = watch::channel(SessionState::Disconnected);
        let (session, _) = watch::channel(None);
        Self {
            config,
            connector,
            negotiator: BindNegotiator::new(),
            state,
            session,
            active: None,
        }
    }

    pub fn handle(&self) -> SessionHandle<K::Client> {
        SessionHandle {
            session: self.session.subscribe(),
            state: self.state.subscribe(),
        }
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    pub fn negotiator(&self) -> &BindNegotiator {
        &self.negotiator
    }

    /// Keep a session up until `shutdown` resolves, then tear it down.
    ///
    /// Every connection that ends, whether it closed, was refused or failed
    /// to bind, is followed by exactly one reconnect after the configured
    /// delay. There is no backoff and no retry limit.
    pub async fn run(mut self, shutdown: impl Future<Output = ()> + Send) {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.run_once() => {}
            }

            info!(
                delay_ms = self.config.reconnect_delay.as_millis() as u64,
                "scheduling reconnect"
            );
            tokio::select! {
                _ = &mut shutdown => break,
                _ = time::sleep(self.config.reconnect_delay) => {}
            }
        }

        self.teardown().await;
    }

    /// One connection from connect to close.
    pub async fn run_once(&mut self) {
        self.set_state(SessionState::Connecting);
        info!(address = %self.config.address(), "connecting to SMSC");

        let (client, mut events) = match self.connector.connect(&self.config).await {
            Ok(connection) => connection,
            Err(e) => {
                error!(error = %e, "connection to SMSC failed");
                self.set_state(SessionState::Disconnected);
                return;
            }
        };
        self.active = Some(client.clone());
        self.set_state(SessionState::Negotiating);

        if let NegotiationOutcome::Bound(_) = self.negotiator.attempt(&client, &self.config).await {
            // Published first, so anyone woken by Bound finds the session.
            self.session.send_replace(Some(client.clone()));
            self.set_state(SessionState::Bound);
        }
        // Otherwise the negotiator closed the connection and Close follows.

        while let Some(event) = events.recv().await {
            match event {
                SessionEvent::Close => break,
                SessionEvent::Error(e) => error!(error = %e, "SMPP session error"),
                SessionEvent::EnquireLink { sequence_number } => {
                    debug!(sequence_number, "enquire_link from SMSC")
                }
                SessionEvent::Unknown {
                    command_id,
                    sequence_number,
                } => info!(
                    command_id = %format!("{command_id:#010x}"),
                    command = CommandId::try_from(command_id).map_or("unknown", CommandId::name),
                    sequence_number,
                    "unhandled PDU from SMSC"
                ),
                SessionEvent::Unbind => warn!("SMSC requested unbind"),
            }
        }

        self.session.send_replace(None);
        self.active = None;
        self.set_state(SessionState::Disconnected);
        warn!("SMPP connection closed");
    }

    /// Unpublish the session, unbind if bound, close. Never fails and never
    /// waits longer than the unbind timeout.
    pub async fn teardown(&mut self) {
        self.session.send_replace(None);

        if let Some(client) = self.active.take() {
            if self.state() == SessionState::Bound {
                match time::timeout(UNBIND_TIMEOUT, client.unbind()).await {
                    Ok(Ok(())) => info!("unbound from SMSC"),
                    Ok(Err(e)) => warn!(error = %e, "unbind failed"),
                    Err(_) => warn!("unbind timed out"),
                }
            }
            client.close();
        }

        self.set_state(SessionState::Disconnected);
    }

    fn set_state(&self, state: SessionState) {
        let previous = self.state.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "session state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{BindType, SessionEvent};
    use crate::gateway::testing::{MockClient, MockConnector};
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    fn config() -> Arc<SessionConfig> {
        Arc::new(SessionConfig::new("smsc", 2775, "gateway", "pw"))
    }

    fn spawn_manager(
        connector: MockConnector,
    ) -> (
        SessionHandle<MockClient>,
        oneshot::Sender<()>,
        JoinHandle<()>,
    ) {
        let manager = SessionManager::new(config(), connector);
        let handle = manager.handle();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(manager.run(async move {
            let _ = stop_rx.await;
        }));
        (handle, stop_tx, task)
    }

    #[tokio::test(start_paused = true)]
    async fn binds_and_publishes_session() {
        let connector = MockConnector::new();
        let (mut handle, _stop, _task) = spawn_manager(connector.clone());

        assert!(handle.wait_for(SessionState::Bound).await);
        assert!(handle.current().is_some());
        assert_eq!(connector.attempts(), 1);
        assert_eq!(connector.bind_types(), vec![BindType::Transmitter]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn bound_state_implies_published_session() {
        for _ in 0..50 {
            let (mut handle, stop, task) = spawn_manager(MockConnector::new());

            assert!(handle.wait_for(SessionState::Bound).await);
            assert!(handle.current().is_some());

            stop.send(()).unwrap();
            task.await.unwrap();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn close_schedules_exactly_one_reconnect() {
        let connector = MockConnector::new();
        let (mut handle, _stop, _task) = spawn_manager(connector.clone());
        assert!(handle.wait_for(SessionState::Bound).await);

        let closed_at = time::Instant::now();
        connector.last_client().unwrap().close();
        assert!(handle.wait_for(SessionState::Disconnected).await);
        assert!(handle.current().is_none());

        time::sleep(Duration::from_millis(4_900)).await;
        assert_eq!(connector.attempts(), 1);

        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(connector.attempts(), 2);
        let times = connector.attempt_times();
        assert!(times[1] - closed_at >= Duration::from_secs(5));

        assert!(handle.wait_for(SessionState::Bound).await);
        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(connector.attempts(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn refused_connect_retries_after_delay() {
        let connector = MockConnector::new().refuse_next(2);
        let (mut handle, _stop, _task) = spawn_manager(connector.clone());

        assert!(handle.wait_for(SessionState::Bound).await);
        assert_eq!(connector.attempts(), 3);

        let times = connector.attempt_times();
        assert_eq!(times[1] - times[0], Duration::from_secs(5));
        assert_eq!(times[2] - times[1], Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_binds_rotate_across_reconnects() {
        let connector = MockConnector::new().with_bind_statuses([0x0E, 0x0E, 0x0E, 0]);
        let (mut handle, _stop, _task) = spawn_manager(connector.clone());

        assert!(handle.wait_for(SessionState::Bound).await);
        assert_eq!(connector.attempts(), 4);
        assert_eq!(
            connector.bind_types(),
            vec![
                BindType::Transmitter,
                BindType::Transmitter,
                BindType::Transmitter,
                BindType::Receiver
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unsolicited_events_do_not_change_state() {
        let connector = MockConnector::new();
        let (mut handle, _stop, _task) = spawn_manager(connector.clone());
        assert!(handle.wait_for(SessionState::Bound).await);

        let client = connector.last_client().unwrap();
        client.emit(SessionEvent::EnquireLink { sequence_number: 1 });
        client.emit(SessionEvent::Unknown {
            command_id: 0x0000_0005,
            sequence_number: 2,
        });
        client.emit(SessionEvent::Error(crate::client::SmppError::Timeout));
        time::sleep(Duration::from_secs(30)).await;

        assert_eq!(handle.state(), SessionState::Bound);
        assert!(handle.current().is_some());
        assert_eq!(connector.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_unbinds_and_closes() {
        let connector = MockConnector::new();
        let (mut handle, stop, task) = spawn_manager(connector.clone());
        assert!(handle.wait_for(SessionState::Bound).await);

        stop.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(connector.unbinds(), 1);
        assert!(!connector.last_client().unwrap().is_connected());
        assert!(handle.current().is_none());
        assert_eq!(handle.state(), SessionState::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_without_session_is_quiet() {
        let mut manager = SessionManager::new(config(), MockConnector::new());
        manager.teardown().await;
        assert_eq!(manager.state(), SessionState::Disconnected);
        assert_eq!(manager.negotiator().failures(), 0);
    }
}
