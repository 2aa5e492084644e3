//! Utility modules

pub mod crypto;
pub mod error;
pub mod logging;
