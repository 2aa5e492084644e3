//! Integration tests
//!
//! Component interactions over a migrated SQLite directory.

mod config_tests;
mod directory_tests;
mod scenario_tests;
