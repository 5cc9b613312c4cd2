//! Admission against a real PostgreSQL database.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p storage -- --ignored

use std::collections::HashMap;

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::{
    Database,
    dto::{
        competition::CreateCompetitionRequest, event::CreateEventRequest,
        user::CreateUserRequest,
    },
    models::{Competition, Event, User},
    repository::{
        competition::CompetitionRepository, dashboard::DashboardRepository,
        event::EventRepository, registration::RegistrationRepository, user::UserRepository,
    },
    services::admission::{AdmissionError, NewRegistration},
};
use tokio::task::JoinSet;
use uuid::Uuid;

async fn database() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a test database");
    let db = Database::new(&url, 40).await.unwrap();
    db.run_migrations().await.unwrap();
    db
}

async fn user(pool: &PgPool, role: &str) -> User {
    UserRepository::new(pool)
        .create(&CreateUserRequest {
            email: format!("{}@rink.test", Uuid::new_v4()),
            name: format!("{} {}", role, Uuid::new_v4()),
            role: role.to_string(),
        })
        .await
        .unwrap()
}

async fn competition(pool: &PgPool, organizer: &User, status: &str) -> Competition {
    let start = Utc::now().date_naive() + Days::new(30);
    CompetitionRepository::new(pool)
        .create(&CreateCompetitionRequest {
            name: "Spring Figure Skating Championship".to_string(),
            description: None,
            start_date: start,
            end_date: start + Days::new(2),
            venue: "Olympic Ice Arena".to_string(),
            address: None,
            status: status.to_string(),
            entry_fee: Decimal::ZERO,
            max_entries: None,
            organizer_id: organizer.id,
            club_id: None,
        })
        .await
        .unwrap()
}

async fn event(pool: &PgPool, competition: &Competition, max_entries: Option<i32>) -> Event {
    EventRepository::new(pool)
        .create(&CreateEventRequest {
            competition_id: competition.id,
            name: "Adult Bronze Freestyle".to_string(),
            description: None,
            category: "Freestyle".to_string(),
            level: Some("Bronze".to_string()),
            age_group: None,
            entry_fee: Decimal::new(7500, 2),
            max_entries,
            requirements: None,
            start_time: None,
            end_time: None,
        })
        .await
        .unwrap()
}

fn request(event: &Event, skater: &User) -> NewRegistration {
    NewRegistration {
        event_id: event.id,
        skater_id: skater.id,
        competition_id: event.competition_id,
        notes: None,
    }
}

async fn stored_count(pool: &PgPool, event: &Event) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE event_id = $1")
        .bind(event.id)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Runs every request concurrently and tallies outcomes by message
async fn admit_concurrently(
    pool: &PgPool,
    requests: Vec<NewRegistration>,
) -> (usize, HashMap<String, usize>) {
    let mut tasks = JoinSet::new();
    for req in requests {
        let pool = pool.clone();
        tasks.spawn(async move { RegistrationRepository::new(&pool).admit(&req).await });
    }

    let mut admitted = 0;
    let mut rejected: HashMap<String, usize> = HashMap::new();
    while let Some(result) = tasks.join_next().await {
        match result.unwrap() {
            Ok(_) => admitted += 1,
            Err(AdmissionError::Storage(e)) => panic!("unexpected storage error: {e}"),
            Err(e) => *rejected.entry(e.to_string()).or_default() += 1,
        }
    }

    (admitted, rejected)
}

#[tokio::test]
#[ignore] // Only run with a PostgreSQL database in DATABASE_URL
async fn test_single_spot_event_scenario() {
    let db = database().await;
    let pool = db.pool();
    let organizer = user(pool, "ORGANIZER").await;
    let first = user(pool, "SKATER").await;
    let second = user(pool, "SKATER").await;
    let competition = competition(pool, &organizer, "REGISTRATION_OPEN").await;
    let event = event(pool, &competition, Some(1)).await;
    let repo = RegistrationRepository::new(pool);

    let admitted = repo.admit(&request(&event, &first)).await.unwrap();
    assert_eq!(admitted.skater.id, first.id);
    assert_eq!(admitted.event.name, "Adult Bronze Freestyle");
    assert_eq!(admitted.event.competition.id, competition.id);

    let again = repo.admit(&request(&event, &first)).await;
    assert!(matches!(again, Err(AdmissionError::AlreadyRegistered)));

    let other = repo.admit(&request(&event, &second)).await;
    assert!(matches!(other, Err(AdmissionError::EventFull)));

    assert_eq!(stored_count(pool, &event).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore] // Only run with a PostgreSQL database in DATABASE_URL
async fn test_concurrent_skaters_never_overfill_an_event() {
    let db = database().await;
    let pool = db.pool();
    let organizer = user(pool, "ORGANIZER").await;
    let competition = competition(pool, &organizer, "REGISTRATION_OPEN").await;
    let event = event(pool, &competition, Some(5)).await;

    let mut requests = Vec::new();
    for _ in 0..30 {
        requests.push(request(&event, &user(pool, "SKATER").await));
    }

    let (admitted, rejected) = admit_concurrently(pool, requests).await;

    assert_eq!(admitted, 5);
    assert_eq!(rejected.get("Event is full"), Some(&25));
    assert_eq!(stored_count(pool, &event).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
#[ignore] // Only run with a PostgreSQL database in DATABASE_URL
async fn test_concurrent_duplicates_store_one_registration() {
    let db = database().await;
    let pool = db.pool();
    let organizer = user(pool, "ORGANIZER").await;
    let skater = user(pool, "SKATER").await;
    let competition = competition(pool, &organizer, "REGISTRATION_OPEN").await;
    let event = event(pool, &competition, None).await;

    let requests = (0..20).map(|_| request(&event, &skater)).collect();
    let (admitted, rejected) = admit_concurrently(pool, requests).await;

    assert_eq!(admitted, 1);
    assert_eq!(
        rejected.get("Skater is already registered for this event"),
        Some(&19)
    );
    assert_eq!(stored_count(pool, &event).await, 1);
}

#[tokio::test]
#[ignore] // Only run with a PostgreSQL database in DATABASE_URL
async fn test_unknown_skater_is_a_storage_error() {
    let db = database().await;
    let pool = db.pool();
    let organizer = user(pool, "ORGANIZER").await;
    let competition = competition(pool, &organizer, "REGISTRATION_OPEN").await;
    let event = event(pool, &competition, None).await;

    let mut req = request(&event, &organizer);
    req.skater_id = Uuid::new_v4();
    let result = RegistrationRepository::new(pool).admit(&req).await;

    match result {
        Err(AdmissionError::Storage(e)) => assert!(e.is_foreign_key_violation()),
        other => panic!("expected a foreign key violation, got {other:?}"),
    }
    assert_eq!(stored_count(pool, &event).await, 0);
}

#[tokio::test]
#[ignore] // Only run with a PostgreSQL database in DATABASE_URL
async fn test_upcoming_events_follow_end_date_only() {
    let db = database().await;
    let pool = db.pool();
    let organizer = user(pool, "ORGANIZER").await;
    let cancelled = competition(pool, &organizer, "CANCELLED").await;
    let open = competition(pool, &organizer, "REGISTRATION_OPEN").await;
    event(pool, &cancelled, None).await;
    event(pool, &open, Some(10)).await;

    let stats = DashboardRepository::new(pool)
        .stats(Some(organizer.id))
        .await
        .unwrap();

    assert_eq!(stats.upcoming_events, 2);
    assert_eq!(stats.active_competitions, 1);
    assert_eq!(stats.total_registrations, 0);
}
