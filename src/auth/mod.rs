//! Authentication and authorization
//!
//! [`AuthSystem`] drives the credential and token lifecycle: credentials are
//! exchanged for a token, each request resolves its token back to an identity,
//! and that identity is checked against the RBAC engine. Any failure along the
//! way leaves the request unauthenticated; nothing carries over between requests.

pub mod jwt;
pub mod rbac;
mod system;
mod types;


pub use jwt::{Claims, JwtHandler, TokenResponse};
pub use rbac::RbacSystem;
pub use system::AuthSystem;
pub use types::AuthContext;
