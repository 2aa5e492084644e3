//! Test suite for rbac-gate
//!
//! ## Test Categories
//!
//! ### 1. Common Utilities (`common/`)
//! - In-memory SQLite directory helpers
//! - Login helpers and assertion macros
//!
//! ### 2. Integration Tests (`integration/`)
//! - SeaORM directory behaviour (uniqueness, ordering, cascades)
//! - End-to-end access-control scenarios over a migrated database
//! - Configuration files
//!
//! ## Running Tests
//!
//! ```bash
//! # Run everything
//! cargo test
//!
//! # Run only unit tests
//! cargo test --lib
//!
//! # Run integration tests
//! cargo test --test lib
//! ```

pub mod common;
pub mod integration;
