//! Database storage implementation using SeaORM

/// Database entities module
pub mod entities;
/// Database migration module
pub mod migration;
/// SeaORM directory implementation module
pub mod seaorm_db;

pub use seaorm_db::{DatabaseBackendType, SeaOrmDirectory};
