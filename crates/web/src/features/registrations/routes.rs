use axum::{Router, routing::get};
use storage::Database;

use super::handlers::{create_registration, get_registration, list_registrations};

pub fn routes() -> Router<Database> {
    Router::new()
        .route("/", get(list_registrations).post(create_registration))
        .route("/:id", get(get_registration))
}
