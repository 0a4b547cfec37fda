//! Scripted stand-ins for the SMPP transport used by the gateway's tests.

use crate::client::{
    BindCredentials, BindType, SessionEvent, SessionEvents, SmppClient, SmppError, SmppResult,
};
use crate::datatypes::{BindResponse, SubmitSm, SubmitSmResponse};
use crate::gateway::{Connector, Dispatcher, SessionConfig, SessionManager, SessionState};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How a scripted submit_sm is answered
pub(crate) enum SubmitReply {
    Status(u32, &'static str),
    Error(SmppError),
    Hang,
}

/// Replies and recordings shared by every connection a connector hands out
#[derive(Default)]
struct Script {
    bind_replies: VecDeque<SmppResult<u32>>,
    submit_replies: VecDeque<SubmitReply>,
    bind_types: Vec<BindType>,
    submitted: Vec<SubmitSm>,
    unbinds: u32,
}

struct Link {
    connected: AtomicBool,
    events: Mutex<Option<mpsc::UnboundedSender<SessionEvent>>>,
}

#[derive(Clone)]
pub(crate) struct MockClient {
    script: Arc<Mutex<Script>>,
    link: Arc<Link>,
}

impl MockClient {
    pub(crate) fn new() -> Self {
        Self::attached(Arc::default(), None)
    }

    fn attached(
        script: Arc<Mutex<Script>>,
        events: Option<mpsc::UnboundedSender<SessionEvent>>,
    ) -> Self {
        Self {
            script,
            link: Arc::new(Link {
                connected: AtomicBool::new(true),
                events: Mutex::new(events),
            }),
        }
    }

    pub(crate) fn with_bind_statuses(self, statuses: impl IntoIterator<Item = u32>) -> Self {
        self.script
            .lock()
            .unwrap()
            .bind_replies
            .extend(statuses.into_iter().map(Ok));
        self
    }

    pub(crate) fn with_bind_errors(self, errors: impl IntoIterator<Item = SmppError>) -> Self {
        self.script
            .lock()
            .unwrap()
            .bind_replies
            .extend(errors.into_iter().map(Err));
        self
    }

    pub(crate) fn with_submit_replies(self, replies: impl IntoIterator<Item = SubmitReply>) -> Self {
        self.script.lock().unwrap().submit_replies.extend(replies);
        self
    }

    pub(crate) fn bind_types(&self) -> Vec<BindType> {
        self.script.lock().unwrap().bind_types.clone()
    }

    pub(crate) fn submitted(&self) -> Vec<SubmitSm> {
        self.script.lock().unwrap().submitted.clone()
    }

    /// Deliver an event as if the SMSC had caused it
    pub(crate) fn emit(&self, event: SessionEvent) {
        if let Some(events) = self.link.events.lock().unwrap().as_ref() {
            let _ = events.send(event);
        }
    }
}

impl SmppClient for MockClient {
    async fn bind(&self, credentials: &BindCredentials) -> SmppResult<BindResponse> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.bind_types.push(credentials.bind_type);
            script.bind_replies.pop_front().unwrap_or(Ok(0))
        };
        let status = reply?;
        Ok(BindResponse::new(credentials.bind_type, 1, status, "MOCK"))
    }

    async fn submit_sm(&self, submit: SubmitSm) -> SmppResult<SubmitSmResponse> {
        if !self.is_connected() {
            return Err(SmppError::ConnectionClosed);
        }

        let (reply, count) = {
            let mut script = self.script.lock().unwrap();
            script.submitted.push(submit);
            (script.submit_replies.pop_front(), script.submitted.len())
        };

        match reply {
            None => Ok(SubmitSmResponse::new(1, 0, format!("MSG{count}"))),
            Some(SubmitReply::Status(status, message_id)) => {
                Ok(SubmitSmResponse::new(1, status, message_id))
            }
            Some(SubmitReply::Error(e)) => Err(e),
            Some(SubmitReply::Hang) => std::future::pending().await,
        }
    }

    async fn unbind(&self) -> SmppResult<()> {
        self.script.lock().unwrap().unbinds += 1;
        Ok(())
    }

    fn close(&self) {
        if self.link.connected.swap(false, Ordering::AcqRel) {
            if let Some(events) = self.link.events.lock().unwrap().take() {
                let _ = events.send(SessionEvent::Close);
            }
        }
    }

    fn is_connected(&self) -> bool {
        self.link.connected.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct Dialer {
    refusals: usize,
    attempts: Vec<Instant>,
    clients: Vec<MockClient>,
}

/// Hands out `MockClient`s that share one script
#[derive(Clone, Default)]
pub(crate) struct MockConnector {
    dialer: Arc<Mutex<Dialer>>,
    script: Arc<Mutex<Script>>,
}

impl MockConnector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Refuse the next `count` connection attempts
    pub(crate) fn refuse_next(self, count: usize) -> Self {
        self.dialer.lock().unwrap().refusals = count;
        self
    }

    pub(crate) fn with_bind_statuses(self, statuses: impl IntoIterator<Item = u32>) -> Self {
        self.script
            .lock()
            .unwrap()
            .bind_replies
            .extend(statuses.into_iter().map(Ok));
        self
    }

    pub(crate) fn attempts(&self) -> usize {
        self.dialer.lock().unwrap().attempts.len()
    }

    pub(crate) fn attempt_times(&self) -> Vec<Instant> {
        self.dialer.lock().unwrap().attempts.clone()
    }

    pub(crate) fn last_client(&self) -> Option<MockClient> {
        self.dialer.lock().unwrap().clients.last().cloned()
    }

    pub(crate) fn bind_types(&self) -> Vec<BindType> {
        self.script.lock().unwrap().bind_types.clone()
    }

    pub(crate) fn unbinds(&self) -> u32 {
        self.script.lock().unwrap().unbinds
    }
}

impl Connector for MockConnector {
    type Client = MockClient;

    async fn connect(&self, _config: &SessionConfig) -> SmppResult<(MockClient, SessionEvents)> {
        let mut dialer = self.dialer.lock().unwrap();
        dialer.attempts.push(Instant::now());

        if dialer.refusals > 0 {
            dialer.refusals -= 1;
            return Err(SmppError::Connection(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )));
        }

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let client = MockClient::attached(self.script.clone(), Some(events_tx));
        dialer.clients.push(client.clone());
        Ok((client, events_rx))
    }
}

/// A dispatcher whose session is already bound to a scripted client
pub(crate) async fn bound_dispatcher(
    replies: Vec<SubmitReply>,
) -> (Dispatcher<MockClient>, MockClient) {
    let config = Arc::new(
        SessionConfig::new("smsc", 2775, "gateway", "pw")
            .with_submit_timeout(Duration::from_secs(30)),
    );
    let connector = MockConnector::new();
    let manager = SessionManager::new(config.clone(), connector.clone());
    let mut handle = manager.handle();
    tokio::spawn(manager.run(std::future::pending::<()>()));
    assert!(handle.wait_for(SessionState::Bound).await);

    let client = connector.last_client().unwrap().with_submit_replies(replies);
    (Dispatcher::new(handle, config), client)
}
