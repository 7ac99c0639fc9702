//! Credentials and sessions
//!
//! Password hashing, HS256 session tokens, the revocation list consulted on
//! every authenticated request, and the axum middleware that ties them
//! together.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod revocation;
pub mod session;
pub mod validation;

pub use error::{AuthError, AuthResult};
pub use jwt::{Claims, JwtConfig, JwtService};
pub use middleware::{AuthenticatedUser, auth_middleware};
pub use password::{hash_password, verify_password};
pub use revocation::RevocationList;
pub use session::SessionManager;
