//! Tracing and logging setup shared by the binaries.
//!
//! [`init`] installs the process-wide subscriber in the requested
//! [`LogFormat`]. Repeated calls are no-ops.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{init, LogFormat, UnknownLogFormat};
