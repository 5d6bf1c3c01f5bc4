//! Span helpers that tie log lines to a single CLI invocation.
//!
//! # Design
//! - One span per command carries the trace id also sent as `x-request-id`.
//! - The outcome is recorded on the span once the command finishes.

use tracing::Span;

use crate::init::build_sha;

/// Build the top-level span for a command invocation.
#[must_use]
pub fn command_span(command: &str, trace_id: &str) -> Span {
    tracing::info_span!(
        "command",
        command = %command,
        trace_id = %trace_id,
        build_sha = %build_sha(),
        outcome = tracing::field::Empty
    )
}

/// Record the final outcome (`success` / `error`) on a command span.
pub fn record_outcome(span: &Span, outcome: &str) {
    span.record("outcome", tracing::field::display(outcome));
}
