//! Command handlers, one module per subcommand.

pub(crate) mod analyze;
pub(crate) mod bulk;
pub(crate) mod catalog;
pub(crate) mod dashboard;
