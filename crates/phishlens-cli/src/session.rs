//! Both submission flows, their inputs, and delivery of remote outcomes.
//!
//! # Design
//! - The session is the only owner of flow state; nothing else mutates it.
//! - Dispatches run as background tasks and report back over a channel, so the
//!   caller stays responsive and applies outcomes on its own schedule.
//! - Outcomes are applied through [`FlowMachine::resolve`], which drops stale ones.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use phishlens_api_models::{AnalysisResult, BULK_RESULT_FILE_NAME, UrlAnalysisRequest};
use tokio::sync::mpsc;

use crate::dispatch::bulk::{DownloadSink, read_upload};
use crate::dispatch::{AnalysisService, DispatchError};
use crate::notify::{BULK_FAILURE_MESSAGE, Notice, SINGLE_FAILURE_MESSAGE};
use crate::state::{Flow, FlowMachine, Resolution, SubmissionState, SubmitRejected, Ticket};

/// Completion report from a background dispatch.
#[derive(Debug)]
pub(crate) enum FlowEvent {
    Single {
        ticket: Ticket,
        outcome: Result<AnalysisResult, DispatchError>,
    },
    Bulk {
        ticket: Ticket,
        outcome: Result<Vec<u8>, DispatchError>,
    },
}

pub(crate) type FlowEvents = mpsc::UnboundedReceiver<FlowEvent>;

/// What changed after an outcome was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Update {
    pub(crate) flow: Flow,
    pub(crate) notice: Notice,
    pub(crate) saved_to: Option<PathBuf>,
}

pub(crate) struct Session {
    service: Arc<dyn AnalysisService>,
    sink: Arc<dyn DownloadSink>,
    events: mpsc::UnboundedSender<FlowEvent>,
    url_input: String,
    selected_file: Option<PathBuf>,
    single: FlowMachine<AnalysisResult>,
    bulk: FlowMachine<()>,
}

impl Session {
    pub(crate) fn new(
        service: Arc<dyn AnalysisService>,
        sink: Arc<dyn DownloadSink>,
    ) -> (Self, FlowEvents) {
        let (events, receiver) = mpsc::unbounded_channel();
        let session = Self {
            service,
            sink,
            events,
            url_input: String::new(),
            selected_file: None,
            single: FlowMachine::new(Flow::Single),
            bulk: FlowMachine::new(Flow::Bulk),
        };
        (session, receiver)
    }

    pub(crate) fn set_url(&mut self, url: impl Into<String>) {
        self.url_input = url.into();
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    /// Pick the CSV for the bulk flow. Only existence is checked; contents are the server's concern.
    pub(crate) fn select_file(&mut self, path: impl Into<PathBuf>) -> Result<(), SubmitRejected> {
        let path = path.into();
        if !path.is_file() {
            return Err(SubmitRejected::NoFileSelected);
        }
        self.selected_file = Some(path);
        Ok(())
    }

    pub(crate) fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub(crate) const fn single_state(&self) -> &SubmissionState<AnalysisResult> {
        self.single.state()
    }

    pub(crate) const fn bulk_state(&self) -> &SubmissionState<()> {
        self.bulk.state()
    }

    /// Whether the single-flow submit control is enabled.
    pub(crate) fn single_gate(&self) -> Result<(), SubmitRejected> {
        if self.single.is_loading() {
            return Err(SubmitRejected::InFlight);
        }
        if self.url_input.is_empty() {
            return Err(SubmitRejected::EmptyInput);
        }
        Ok(())
    }

    /// Whether the bulk-flow submit control is enabled.
    pub(crate) fn bulk_gate(&self) -> Result<(), SubmitRejected> {
        if self.bulk.is_loading() {
            return Err(SubmitRejected::InFlight);
        }
        if self.selected_file.is_none() {
            return Err(SubmitRejected::NoFileSelected);
        }
        Ok(())
    }

    /// Dispatch the current URL. Exactly one request is issued per accepted call.
    pub(crate) fn submit_single(&mut self) -> Result<Ticket, SubmitRejected> {
        self.single_gate()?;
        let ticket = self.single.submit()?;
        let request = UrlAnalysisRequest {
            url: self.url_input.clone(),
        };
        tracing::info!(url = %request.url, "dispatching url analysis");

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = service.analyze(request).await;
            // receiver gone means the session was dropped; nothing left to update
            let _ = events.send(FlowEvent::Single { ticket, outcome });
        });
        Ok(ticket)
    }

    /// Dispatch the selected CSV file.
    pub(crate) fn submit_bulk(&mut self) -> Result<Ticket, SubmitRejected> {
        self.bulk_gate()?;
        let Some(path) = self.selected_file.clone() else {
            return Err(SubmitRejected::NoFileSelected);
        };
        let ticket = self.bulk.submit()?;
        tracing::info!(file = %path.display(), "dispatching bulk analysis");

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = match read_upload(&path).await {
                Ok(request) => service.bulk_analyze(request).await,
                Err(err) => Err(err),
            };
            let _ = events.send(FlowEvent::Bulk { ticket, outcome });
        });
        Ok(ticket)
    }

    /// Clear the single flow and its URL input. In-flight work is not aborted.
    pub(crate) fn reset_single(&mut self) {
        self.single.reset();
        self.url_input.clear();
    }

    /// Apply a completion report. Returns `None` when the outcome was stale.
    pub(crate) async fn apply(&mut self, event: FlowEvent) -> Option<Update> {
        match event {
            FlowEvent::Single { ticket, outcome } => self.apply_single(ticket, outcome),
            FlowEvent::Bulk { ticket, outcome } => self.apply_bulk(ticket, outcome).await,
        }
    }

    /// Wait for the next outcome that actually changes state.
    pub(crate) async fn settle(&mut self, events: &mut FlowEvents) -> Option<Update> {
        loop {
            let event = events.recv().await?;
            if let Some(update) = self.apply(event).await {
                return Some(update);
            }
        }
    }

    fn apply_single(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, DispatchError>,
    ) -> Option<Update> {
        let (outcome, notice) = match outcome {
            Ok(result) => {
                let notice = Notice::url_analyzed(result.is_safe);
                (Ok(result), notice)
            }
            Err(err) => {
                tracing::warn!(
                    flow = ticket.flow().label(),
                    cause = err.kind(),
                    error = %err,
                    "url analysis failed"
                );
                (Err(SINGLE_FAILURE_MESSAGE.to_string()), Notice::url_failed())
            }
        };
        match self.single.resolve(ticket, outcome) {
            Resolution::Applied => Some(Update {
                flow: Flow::Single,
                notice,
                saved_to: None,
            }),
            Resolution::Stale => None,
        }
    }

    async fn apply_bulk(
        &mut self,
        ticket: Ticket,
        outcome: Result<Vec<u8>, DispatchError>,
    ) -> Option<Update> {
        // checked before delivery so a reset flow never produces a file
        if !self.bulk.is_current(ticket) {
            tracing::debug!(flow = ticket.flow().label(), "ignoring stale bulk outcome");
            return None;
        }

        let delivered = match outcome {
            Ok(bytes) => self
                .sink
                .deliver(BULK_RESULT_FILE_NAME, &bytes)
                .await
                .map_err(|err| {
                    tracing::warn!(cause = "download", error = %err, "bulk result could not be saved");
                }),
            Err(err) => {
                tracing::warn!(cause = err.kind(), error = %err, "bulk analysis failed");
                Err(())
            }
        };

        let update = match delivered {
            Ok(path) => {
                tracing::info!(path = %path.display(), "bulk result saved");
                self.bulk.resolve(ticket, Ok(()));
                Update {
                    flow: Flow::Bulk,
                    notice: Notice::bulk_completed(),
                    saved_to: Some(path),
                }
            }
            Err(()) => {
                self.bulk
                    .resolve(ticket, Err(BULK_FAILURE_MESSAGE.to_string()));
                Update {
                    flow: Flow::Bulk,
                    notice: Notice::bulk_failed(),
                    saved_to: None,
                }
            }
        };
        Some(update)
    }
}
