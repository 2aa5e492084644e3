mod connection;
mod directory;
mod types;

pub use types::{DatabaseBackendType, SeaOrmDirectory};
