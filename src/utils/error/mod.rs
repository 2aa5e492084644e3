//! Error handling for the access-control core
//!
//! This module defines the error type shared by every component, the helper
//! constructors used to build it, and the transport-neutral status mapping.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GateError, Result};
