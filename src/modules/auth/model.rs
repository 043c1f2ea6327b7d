pub use academy_models::admins::{Admin, AdminProfile, AdminRole, UpdateProfileDto};
pub use academy_models::auth::{LoginRequest, LoginResponse};
