use axum::{Router, middleware, routing::get};
use storage::Database;

use super::handlers::get_dashboard;
use crate::middleware::auth::{ApiKeys, require_auth};

pub fn routes(api_keys: ApiKeys) -> Router<Database> {
    Router::new()
        .route("/", get(get_dashboard))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
