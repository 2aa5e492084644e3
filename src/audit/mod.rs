//! Audit trail
//!
//! Privileged mutations report here after they succeed. Recording is
//! best-effort: a failed write is logged and dropped, never returned to the
//! operation that triggered it.

mod logger;

pub use logger::{AuditAction, AuditLogger};
