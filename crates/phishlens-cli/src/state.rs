//! Submission lifecycle shared by the single-URL and bulk flows.
//!
//! # Design
//! - One machine per flow; each enforces single-flight on itself.
//! - `submit` hands out a [`Ticket`]; an outcome only lands if its ticket is current.
//! - `reset` advances the generation so responses issued before it are ignored.

use std::fmt::{self, Display, Formatter};

use thiserror::Error;

/// The two independent submission paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Single,
    Bulk,
}

impl Flow {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Bulk => "bulk",
        }
    }
}

/// Lifecycle of one flow. `T` is the retained success payload.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum SubmissionState<T> {
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> SubmissionState<T> {
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }
}

impl<T> Display for SubmissionState<T> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Reasons a submission is refused before anything is dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub(crate) enum SubmitRejected {
    #[error("enter a URL to analyze")]
    EmptyInput,
    #[error("select a CSV file to analyze")]
    NoFileSelected,
    #[error("an analysis is already in progress")]
    InFlight,
}

/// Proof that a submission was accepted; echoed back with its outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ticket {
    flow: Flow,
    generation: u64,
}

impl Ticket {
    pub(crate) const fn flow(self) -> Flow {
        self.flow
    }
}

/// Whether an outcome changed the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Resolution {
    Applied,
    Stale,
}

#[derive(Debug)]
pub(crate) struct FlowMachine<T> {
    flow: Flow,
    generation: u64,
    state: SubmissionState<T>,
}

impl<T> FlowMachine<T> {
    pub(crate) const fn new(flow: Flow) -> Self {
        Self {
            flow,
            generation: 0,
            state: SubmissionState::Idle,
        }
    }

    pub(crate) const fn state(&self) -> &SubmissionState<T> {
        &self.state
    }

    pub(crate) const fn is_loading(&self) -> bool {
        matches!(self.state, SubmissionState::Loading)
    }

    /// Move to `Loading`. Refused while a request of this flow is outstanding.
    pub(crate) fn submit(&mut self) -> Result<Ticket, SubmitRejected> {
        if self.is_loading() {
            return Err(SubmitRejected::InFlight);
        }
        self.generation += 1;
        self.state = SubmissionState::Loading;
        tracing::debug!(flow = self.flow.label(), generation = self.generation, "submission started");
        Ok(Ticket {
            flow: self.flow,
            generation: self.generation,
        })
    }

    /// True when `ticket` belongs to the request this machine is waiting on.
    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        ticket.flow == self.flow && ticket.generation == self.generation && self.is_loading()
    }

    /// Settle the outstanding request. Outcomes for superseded tickets are dropped.
    pub(crate) fn resolve(&mut self, ticket: Ticket, outcome: Result<T, String>) -> Resolution {
        if !self.is_current(ticket) {
            tracing::debug!(
                flow = self.flow.label(),
                ticket = ticket.generation,
                current = self.generation,
                state = self.state.name(),
                "ignoring stale outcome"
            );
            return Resolution::Stale;
        }
        self.state = match outcome {
            Ok(payload) => SubmissionState::Success(payload),
            Err(message) => SubmissionState::Error(message),
        };
        tracing::debug!(flow = self.flow.label(), state = self.state.name(), "submission settled");
        Resolution::Applied
    }

    /// Return to `Idle`, dropping any retained result and any interest in in-flight work.
    pub(crate) fn reset(&mut self) {
        self.generation += 1;
        self.state = SubmissionState::Idle;
        tracing::debug!(flow = self.flow.label(), "flow reset");
    }
}
