//! Services module
//!
//! Business operations layered over the auth system and directory.

pub mod admin;
pub mod users;

pub use admin::AdminService;
pub use users::UserService;

use crate::utils::error::{GateError, Result};

/// Largest accepted page size
pub const MAX_PAGE_SIZE: u64 = 100;

/// Validate 1-based paging and turn it into (offset, limit)
pub(crate) fn page_window(page: u64, page_size: u64) -> Result<(u64, u64)> {
    if page == 0 {
        return Err(GateError::invalid_request("Page must be at least 1"));
    }
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(GateError::invalid_request(format!(
            "Page size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }
    Ok(((page - 1).saturating_mul(page_size), page_size))
}
