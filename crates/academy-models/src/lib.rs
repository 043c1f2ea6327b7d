//! # Academy Models
//!
//! Domain entities and request/response DTOs shared by the API server and
//! the CLI.
//!
//! - [`admins`]: administrator accounts and roles
//! - [`auth`]: login request and response
//! - [`parents`]: guardians owning one or more students
//! - [`teachers`]: teachers leading classes
//! - [`classes`]: age-bracketed classes with capacity
//! - [`registrations`]: students, review status, listing queries
//! - [`validation`]: shared patterns and custom rules

pub mod admins;
pub mod auth;
pub mod classes;
pub mod parents;
pub mod registrations;
pub mod teachers;
pub mod validation;

pub use admins::{Admin, AdminProfile, AdminRole};
pub use classes::{Class, ClassWithTeacher};
pub use parents::Parent;
pub use registrations::{RegistrationStatus, Student};
pub use teachers::Teacher;
