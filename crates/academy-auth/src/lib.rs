//! # Academy Auth
//!
//! JWT claims and token helpers for admin sessions.
//!
//! ```ignore
//! use academy_auth::{create_access_token, verify_token};
//!
//! let token = create_access_token(admin.id, &admin.email, "admin", &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
