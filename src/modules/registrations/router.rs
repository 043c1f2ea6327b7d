use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

use super::controller::{
    create_registration, get_registration, get_registrations, update_class, update_status,
};

pub fn init_registrations_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_registrations).post(create_registration))
        .route("/{id}", get(get_registration))
        .route("/{id}/status", patch(update_status))
        .route("/{id}/class", patch(update_class))
}
