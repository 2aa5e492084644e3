//! JWT token handling
//!
//! Tokens are HS256-signed and stateless: possession of a validly signed,
//! unexpired token is the session. There is no revocation list.

mod handler;
pub mod types;


pub use types::{Claims, JwtHandler, TokenResponse};
