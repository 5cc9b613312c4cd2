pub mod competitions;
pub mod dashboard;
pub mod events;
pub mod registrations;
pub mod users;

use axum::Router;
use storage::Database;

use crate::middleware::auth::ApiKeys;

/// All API routes. Reads are public; writes and the dashboard need an API key.
pub fn router(db: Database, api_keys: ApiKeys) -> Router {
    Router::new()
        .nest("/api/competitions", competitions::routes(api_keys.clone()))
        .nest("/api/events", events::routes(api_keys.clone()))
        .nest("/api/registrations", registrations::routes())
        .nest("/api/users", users::routes(api_keys.clone()))
        .nest("/api/dashboard", dashboard::routes(api_keys))
        .with_state(db)
}
