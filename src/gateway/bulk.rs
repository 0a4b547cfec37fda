//! Bulk submission: one message to many destinations.
//!
//! Batches go through a single queue worker, so batches from concurrent
//! callers never interleave on the shared session. Within a batch each
//! submission is awaited before the next is issued.

use crate::client::SmppClient;
use crate::gateway::dispatcher::{Dispatcher, SubmissionRequest, SubmissionResult};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Default number of batches that may wait for the worker
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BulkError {
    /// Rejected before any submission was made
    #[error("{0}")]
    InvalidInput(String),

    #[error("bulk submission queue is closed")]
    QueueClosed,
}

/// A destination that got its message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentMessage {
    pub success: bool,
    pub message_id: String,
    pub destination: String,
}

/// A destination that did not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedMessage {
    pub destination: String,
    pub error: String,
}

/// Per-destination outcomes of one batch, split by success and each kept in
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkResult {
    /// True if at least one destination succeeded
    #[serde(rename = "success")]
    pub overall_success: bool,
    pub results: Vec<SentMessage>,
    pub errors: Vec<FailedMessage>,
}

impl FromIterator<SubmissionResult> for BulkResult {
    fn from_iter<I: IntoIterator<Item = SubmissionResult>>(iter: I) -> Self {
        let mut results = Vec::new();
        let mut errors = Vec::new();

        for outcome in iter {
            match outcome {
                SubmissionResult::Sent {
                    destination,
                    message_id,
                } => results.push(SentMessage {
                    success: true,
                    message_id,
                    destination,
                }),
                SubmissionResult::Failed { destination, error } => errors.push(FailedMessage {
                    destination,
                    error: error.to_string(),
                }),
            }
        }

        BulkResult {
            overall_success: !results.is_empty(),
            results,
            errors,
        }
    }
}

/// One message for a list of destinations
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRequest {
    pub destinations: Vec<String>,
    pub message: String,
}

impl BulkRequest {
    pub fn new(destinations: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            destinations,
            message: message.into(),
        }
    }

    /// Batch-level checks. A bad destination fails on its own, not the batch.
    pub fn validate(&self) -> Result<(), BulkError> {
        if self.destinations.is_empty() {
            return Err(BulkError::InvalidInput(
                "phones must contain at least one destination".to_string(),
            ));
        }
        if self.message.is_empty() {
            return Err(BulkError::InvalidInput("message must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Submit `request.message` to every destination in order, never stopping
/// early.
pub async fn submit_all<C: SmppClient>(
    dispatcher: &Dispatcher<C>,
    request: &BulkRequest,
) -> BulkResult {
    let mut outcomes = Vec::with_capacity(request.destinations.len());

    for destination in &request.destinations {
        let submission = SubmissionRequest::new(destination.as_str(), request.message.as_str());
        outcomes.push(dispatcher.submit(&submission).await);
    }

    let result: BulkResult = outcomes.into_iter().collect();
    info!(
        sent = result.results.len(),
        failed = result.errors.len(),
        "bulk submission finished"
    );
    result
}

struct BulkJob {
    request: BulkRequest,
    reply: oneshot::Sender<BulkResult>,
}

/// Handle to queue batches for the bulk worker.
#[derive(Debug, Clone)]
pub struct BulkHandle {
    jobs: mpsc::Sender<BulkJob>,
}

impl BulkHandle {
    /// Validate and queue a batch, then wait for its result.
    pub async fn submit(&self, request: BulkRequest) -> Result<BulkResult, BulkError> {
        request.validate()?;

        let (reply, result) = oneshot::channel();
        self.jobs
            .send(BulkJob { request, reply })
            .await
            .map_err(|_| BulkError::QueueClosed)?;

        result.await.map_err(|_| BulkError::QueueClosed)
    }
}

impl std::fmt::Debug for BulkJob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkJob")
            .field("destinations", &self.request.destinations.len())
            .finish()
    }
}

/// Spawn the worker that runs batches one at a time.
pub fn spawn_bulk_worker<C: SmppClient>(dispatcher: Dispatcher<C>, depth: usize) -> BulkHandle {
    let (jobs, mut queue) = mpsc::channel::<BulkJob>(depth.max(1));

    tokio::spawn(async move {
        while let Some(job) = queue.recv().await {
            debug!(destinations = job.request.destinations.len(), "bulk batch started");
            let result = submit_all(&dispatcher, &job.request).await;
            // The caller may have gone away; the batch still ran.
            let _ = job.reply.send(result);
        }
        debug!("bulk worker stopped");
    });

    BulkHandle { jobs }
}
