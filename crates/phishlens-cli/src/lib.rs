#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Terminal dashboard for submitting URLs to a PhishLens classification service.
//!
//! Layout:
//! - `cli.rs`: argument parsing and command dispatch
//! - `commands/`: command handlers (one-shot analysis, bulk upload, catalog, dashboard)
//! - `client.rs`: shared HTTP client, CLI errors, and telemetry helpers
//! - `dispatch/`: remote calls for the single-URL and bulk flows
//! - `state.rs`: per-flow submission state machine
//! - `session.rs`: both flows, their inputs, and outcome delivery
//! - `notify.rs`: fixed user-facing notices
//! - `output.rs`: report projection and renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod dispatch;
pub(crate) mod notify;
pub(crate) mod output;
pub(crate) mod session;
pub(crate) mod state;

pub use cli::run;
