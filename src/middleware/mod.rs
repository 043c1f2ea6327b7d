//! Middleware and extractors for cross-cutting request concerns.
//!
//! - [`auth`]: bearer token authentication (`AuthUser`)
//! - [`role`]: administrator role checks (`AdminUser`)
//! - [`rate_limit`]: per-IP request throttling
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the JWT and loads the admin it names
//! 3. `AdminUser` checks the admin holds an administrator role
//! 4. Handler executes if all checks pass
//!
//! ```ignore
//! async fn list_registrations(AdminUser(admin): AdminUser) -> impl IntoResponse {
//!     // only reachable with a valid token for an active admin
//! }
//! ```

pub mod auth;
pub mod rate_limit;
pub mod role;
