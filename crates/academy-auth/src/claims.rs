//! JWT claim structure for admin session tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Claims embedded in an admin access token.
///
/// - `sub`: admin ID
/// - `email`: admin email at issue time
/// - `role`: `admin` or `super_admin`
/// - `exp` / `iat`: expiry and issued-at timestamps (seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn admin_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
