//! Single message submission over the current session.

use crate::client::{SmppClient, SmppError, SmsMessage};
use crate::datatypes::{DataCoding, describe_status};
use crate::gateway::{SessionConfig, SessionHandle};
use std::sync::Arc;
use thiserror::Error;
use tokio::time;
use tracing::{info, warn};

/// Why one destination did not get its message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("no active SMPP session")]
    NoActiveSession,

    #[error("submission timed out")]
    Timeout,

    #[error("submission rejected, status code: {0}")]
    Rejected(u32),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("transport error: {0}")]
    Transport(String),
}

/// One outbound message
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub destination: String,
    pub message: String,
    pub data_coding: DataCoding,
}

impl SubmissionRequest {
    /// A request using UCS-2, which covers any text
    pub fn new(destination: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            message: message.into(),
            data_coding: DataCoding::Ucs2,
        }
    }
}

/// Outcome for one destination
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Sent {
        destination: String,
        message_id: String,
    },
    Failed {
        destination: String,
        error: DispatchError,
    },
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Sent { .. })
    }

    pub fn destination(&self) -> &str {
        match self {
            SubmissionResult::Sent { destination, .. }
            | SubmissionResult::Failed { destination, .. } => destination,
        }
    }
}

/// Submits messages over whatever session is bound at the moment.
///
/// The dispatcher never waits for a session: with none bound, a submission
/// fails immediately.
#[derive(Debug, Clone)]
pub struct Dispatcher<C> {
    session: SessionHandle<C>,
    config: Arc<SessionConfig>,
}

impl<C: SmppClient> Dispatcher<C> {
    pub fn new(session: SessionHandle<C>, config: Arc<SessionConfig>) -> Self {
        Self { session, config }
    }

    pub fn session(&self) -> &SessionHandle<C> {
        &self.session
    }

    /// Submit one message and wait for its outcome, bounded by the submit
    /// timeout.
    pub async fn submit(&self, request: &SubmissionRequest) -> SubmissionResult {
        let destination = request.destination.clone();

        match self.try_submit(request).await {
            Ok(message_id) => {
                info!(%destination, %message_id, "message submitted");
                SubmissionResult::Sent {
                    destination,
                    message_id,
                }
            }
            Err(error) => {
                match &error {
                    DispatchError::Rejected(status) => warn!(
                        %destination,
                        status = %describe_status(*status),
                        "submission rejected"
                    ),
                    other => warn!(%destination, error = %other, "submission failed"),
                }
                SubmissionResult::Failed { destination, error }
            }
        }
    }

    async fn try_submit(&self, request: &SubmissionRequest) -> Result<String, DispatchError> {
        if request.destination.trim().is_empty() {
            return Err(DispatchError::InvalidMessage(
                "destination must not be empty".to_string(),
            ));
        }

        let client = self
            .session
            .current()
            .ok_or(DispatchError::NoActiveSession)?;

        let submit = SmsMessage::new(
            request.destination.as_str(),
            self.config.system_id.as_str(),
            request.message.as_str(),
        )
        .with_data_coding(request.data_coding)
        .to_submit_sm()
        .map_err(|e| DispatchError::InvalidMessage(e.to_string()))?;

        let response = time::timeout(self.config.submit_timeout, client.submit_sm(submit))
            .await
            .map_err(|_| DispatchError::Timeout)?;

        match response {
            Ok(response) if response.command_status == 0 => Ok(response.message_id),
            Ok(response) => Err(DispatchError::Rejected(response.command_status)),
            Err(SmppError::Protocol(status)) => Err(DispatchError::Rejected(status)),
            Err(SmppError::Codec(e)) => Err(DispatchError::InvalidMessage(e.to_string())),
            Err(e) => Err(DispatchError::Transport(e.to_string())),
        }
    }
}
