// ABOUTME: Default SMPP client implementation backed by one tokio I/O task per connection
// ABOUTME: Correlates responses by sequence number, answers peer PDUs and runs the keep-alive

use crate::client::error::{SmppError, SmppResult};
use crate::client::keepalive::{KeepAliveAction, KeepAliveConfig, KeepAliveManager};
use crate::client::traits::{SessionEvent, SessionEvents, SmppClient};
use crate::client::types::BindCredentials;
use crate::codec::Frame;
use crate::connection::Connection;
use crate::datatypes::{
    BindResponse, CommandId, DeliverSmResponse, EnquireLink, EnquireLinkResponse, GenericNack,
    SubmitSm, SubmitSmResponse, Unbind, UnbindResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Sequence numbers run from 1 to 0x7FFFFFFF and then wrap
const MAX_SEQUENCE_NUMBER: u32 = 0x7FFF_FFFF;

/// How long closing waits for buffered writes to drain
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

type Reply = oneshot::Sender<SmppResult<Frame>>;

enum Command {
    Request { frame: Frame, reply: Reply },
    Close,
}

/// Default SMPP client implementation
///
/// `DefaultClient` is a handle. The connection itself is owned by a spawned
/// I/O task which:
///
/// * writes requests and routes each response to its caller by sequence number
/// * answers enquire_link, unbind and deliver_sm from the SMSC
/// * sends enquire_link on the keep-alive interval and closes the link once
///   too many go unanswered
/// * reports everything else as [`SessionEvent`]s
///
/// Several requests may be outstanding at once; each waits only for its own
/// response.
#[derive(Clone, Debug)]
pub struct DefaultClient {
    commands: mpsc::UnboundedSender<Command>,
    sequence: Arc<AtomicU32>,
    connected: Arc<AtomicBool>,
}

impl DefaultClient {
    /// Open a TCP connection to the SMSC and start its I/O task.
    pub async fn connect<T: ToSocketAddrs>(
        addr: T,
        keep_alive: KeepAliveConfig,
    ) -> SmppResult<(Self, SessionEvents)> {
        let socket = TcpStream::connect(addr).await?;
        if let Ok(peer) = socket.peer_addr() {
            info!(%peer, "connected to SMSC");
        }
        Ok(Self::from_socket(socket, keep_alive))
    }

    /// Wrap an already connected socket.
    pub fn from_socket(socket: TcpStream, keep_alive: KeepAliveConfig) -> (Self, SessionEvents) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let sequence = Arc::new(AtomicU32::new(0));
        let connected = Arc::new(AtomicBool::new(true));

        let task = IoTask {
            connection: Connection::new(socket),
            commands: commands_rx,
            events: events_tx,
            pending: HashMap::new(),
            keep_alive: KeepAliveManager::new(keep_alive),
            sequence: sequence.clone(),
            connected: connected.clone(),
        };
        tokio::spawn(task.run());

        let client = DefaultClient {
            commands: commands_tx,
            sequence,
            connected,
        };
        (client, events_rx)
    }

    /// Get next sequence number for PDU
    pub fn next_sequence_number(&self) -> u32 {
        next_sequence(&self.sequence)
    }

    async fn request(&self, frame: Frame) -> SmppResult<Frame> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Request { frame, reply })
            .map_err(|_| SmppError::ConnectionClosed)?;
        response.await.map_err(|_| SmppError::ConnectionClosed)?
    }
}

impl SmppClient for DefaultClient {
    async fn bind(&self, credentials: &BindCredentials) -> SmppResult<BindResponse> {
        let sequence_number = self.next_sequence_number();
        let bind = credentials.to_bind(sequence_number);

        match self.request(Frame::Bind(bind)).await? {
            Frame::BindResp(response) if response.bind_type == credentials.bind_type => {
                Ok(response)
            }
            Frame::GenericNack(nack) => Err(SmppError::Protocol(nack.command_status)),
            other => Err(SmppError::UnexpectedPdu {
                expected: format!("bind_{}_resp", credentials.bind_type),
                actual: format!("{other:?}"),
            }),
        }
    }

    async fn submit_sm(&self, mut submit: SubmitSm) -> SmppResult<SubmitSmResponse> {
        submit.sequence_number = self.next_sequence_number();

        match self.request(Frame::SubmitSm(Box::new(submit))).await? {
            Frame::SubmitSmResp(response) => Ok(response),
            Frame::GenericNack(nack) => Err(SmppError::Protocol(nack.command_status)),
            other => Err(SmppError::UnexpectedPdu {
                expected: "submit_sm_resp".to_string(),
                actual: format!("{other:?}"),
            }),
        }
    }

    async fn unbind(&self) -> SmppResult<()> {
        let sequence_number = self.next_sequence_number();

        match self.request(Frame::Unbind(Unbind::new(sequence_number))).await {
            Ok(Frame::UnbindResp(response)) if response.command_status != 0 => {
                Err(SmppError::Protocol(response.command_status))
            }
            Ok(Frame::UnbindResp(_)) => Ok(()),
            Ok(other) => Err(SmppError::UnexpectedPdu {
                expected: "unbind_resp".to_string(),
                actual: format!("{other:?}"),
            }),
            // Connection closed during unbind is acceptable
            Err(SmppError::ConnectionClosed) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }
}

fn next_sequence(counter: &AtomicU32) -> u32 {
    let mut current = counter.load(Ordering::Relaxed);
    loop {
        let next = if current >= MAX_SEQUENCE_NUMBER {
            1
        } else {
            current + 1
        };
        match counter.compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => current = actual,
        }
    }
}

/// Drop requests whose caller stopped waiting, such as after a submit
/// timeout. Returns how many were dropped.
fn prune_abandoned(pending: &mut HashMap<u32, Reply>) -> usize {
    let before = pending.len();
    pending.retain(|_, reply| !reply.is_closed());

    let dropped = before - pending.len();
    if dropped > 0 {
        debug!(dropped, "dropped abandoned requests");
    }
    dropped
}

/// Whether the I/O loop keeps going after handling a frame
enum Flow {
    Continue,
    Close,
}

struct IoTask {
    connection: Connection,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
    pending: HashMap<u32, Reply>,
    keep_alive: KeepAliveManager,
    sequence: Arc<AtomicU32>,
    connected: Arc<AtomicBool>,
}

impl IoTask {
    async fn run(mut self) {
        let interval = self.keep_alive.interval();
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let failure = loop {
            tokio::select! {
                frame = self.connection.read_frame() => match frame {
                    Ok(Some(frame)) => match self.handle_frame(frame).await {
                        Ok(Flow::Continue) => {}
                        Ok(Flow::Close) => break None,
                        Err(e) => break Some(e),
                    },
                    Ok(None) => {
                        debug!("SMSC closed the connection");
                        break None;
                    }
                    Err(e) => break Some(SmppError::from(e)),
                },
                command = self.commands.recv() => match command {
                    Some(Command::Request { frame, reply }) => {
                        if let Err(e) = self.send_request(frame, reply).await {
                            break Some(e);
                        }
                    }
                    // All handles dropped or an explicit close
                    Some(Command::Close) | None => break None,
                },
                _ = ticker.tick() => {
                    prune_abandoned(&mut self.pending);
                    if let Err(e) = self.keep_alive_tick().await {
                        break Some(e);
                    }
                }
            }
        };

        self.shutdown(failure).await;
    }

    async fn send_request(&mut self, frame: Frame, reply: Reply) -> SmppResult<()> {
        let sequence_number = frame.sequence_number();
        debug!(
            command_id = frame.command_id(),
            sequence_number,
            "sending request"
        );

        if let Err(e) = frame.to_bytes() {
            // A PDU that cannot be encoded fails on its own; the link is fine.
            let _ = reply.send(Err(SmppError::Codec(e)));
            return Ok(());
        }

        self.pending.insert(sequence_number, reply);
        self.connection.write_frame(&frame).await?;
        Ok(())
    }

    async fn keep_alive_tick(&mut self) -> SmppResult<()> {
        match self.keep_alive.on_tick() {
            KeepAliveAction::Ping => {
                let sequence_number = next_sequence(&self.sequence);
                self.connection
                    .write_frame(&Frame::EnquireLink(EnquireLink::new(sequence_number)))
                    .await?;
                self.keep_alive.on_ping_sent(sequence_number);
                Ok(())
            }
            KeepAliveAction::Close => {
                let status = self.keep_alive.status();
                warn!(
                    consecutive_failures = status.consecutive_failures,
                    "keep-alive failed, closing connection"
                );
                Err(SmppError::Timeout)
            }
            KeepAliveAction::Idle => Ok(()),
        }
    }

    async fn handle_frame(&mut self, frame: Frame) -> SmppResult<Flow> {
        let sequence_number = frame.sequence_number();

        if frame.is_response() {
            if let Frame::EnquireLinkResp(_) = frame {
                self.keep_alive.on_pong(sequence_number);
                return Ok(Flow::Continue);
            }

            match self.pending.remove(&sequence_number) {
                Some(reply) => {
                    let _ = reply.send(Ok(frame));
                }
                None => {
                    debug!(sequence_number, "response matches no outstanding request");
                    self.emit(SessionEvent::Unknown {
                        command_id: frame.command_id(),
                        sequence_number,
                    });
                }
            }
            return Ok(Flow::Continue);
        }

        match frame {
            Frame::EnquireLink(_) => {
                self.connection
                    .write_frame(&Frame::EnquireLinkResp(EnquireLinkResponse::new(
                        sequence_number,
                    )))
                    .await?;
                self.emit(SessionEvent::EnquireLink { sequence_number });
                Ok(Flow::Continue)
            }
            Frame::Unbind(_) => {
                self.connection
                    .write_frame(&Frame::UnbindResp(UnbindResponse::new(sequence_number)))
                    .await?;
                self.emit(SessionEvent::Unbind);
                Ok(Flow::Close)
            }
            other => {
                let command_id = other.command_id();
                let reply = if command_id == CommandId::DeliverSm as u32 {
                    Frame::DeliverSmResp(DeliverSmResponse::new(sequence_number))
                } else {
                    Frame::GenericNack(GenericNack::invalid_command_id(sequence_number))
                };
                self.connection.write_frame(&reply).await?;
                self.emit(SessionEvent::Unknown {
                    command_id,
                    sequence_number,
                });
                Ok(Flow::Continue)
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        // The owner may have stopped listening; the connection still works.
        let _ = self.events.send(event);
    }

    async fn shutdown(mut self, failure: Option<SmppError>) {
        self.connected.store(false, Ordering::Release);
        self.commands.close();

        if let Some(e) = failure {
            self.emit(SessionEvent::Error(e));
        }

        for (_, reply) in self.pending.drain() {
            let _ = reply.send(Err(SmppError::ConnectionClosed));
        }
        while let Ok(command) = self.commands.try_recv() {
            if let Command::Request { reply, .. } = command {
                let _ = reply.send(Err(SmppError::ConnectionClosed));
            }
        }

        let _ = time::timeout(SHUTDOWN_GRACE, self.connection.shutdown()).await;
        self.emit(SessionEvent::Close);
    }
}
