//! Loads the demo organizer, skaters, competition and events.

use anyhow::Context;
use storage::{Database, seed::seed_demo_data};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").context("Cannot load DATABASE_URL env variable")?;

    let db = Database::new(&database_url, 1)
        .await
        .context("Failed to initialize database")?;

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;

    tracing::info!("Seeding demo data");
    let report = seed_demo_data(db.pool())
        .await
        .context("Failed to seed demo data")?;

    tracing::info!(
        users = report.users,
        clubs = report.clubs,
        competitions = report.competitions,
        events = report.events,
        registrations = report.registrations,
        "Seed completed"
    );

    Ok(())
}
