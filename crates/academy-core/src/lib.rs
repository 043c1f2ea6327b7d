//! # Academy Core
//!
//! Foundational types shared by every crate in the workspace:
//!
//! - [`errors`]: `AppError` and its HTTP response conversion
//! - [`response`]: `{ success, message, data }` envelopes
//! - [`pagination`]: page/limit query parameters and response metadata
//! - [`password`]: bcrypt hashing and verification
//! - [`age`]: whole-year age arithmetic for class eligibility
//! - [`serde`]: lenient query-string deserializers

pub mod age;
pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, MessageResponse, PaginatedResponse};
