//! Demo fixture: one organizer, two skaters, a coach, a club, one
//! competition with three events and two registrations. Every insert is
//! keyed on a fixed id, so loading twice leaves the database unchanged.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::Result;

pub const ORGANIZER_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0001_4000_8000_0000_0000_0001);
pub const SKATER_EMMA_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0001_4000_8000_0000_0000_0002);
pub const SKATER_MICHAEL_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0001_4000_8000_0000_0000_0003);
pub const COACH_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0001_4000_8000_0000_0000_0004);
pub const CLUB_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0002_4000_8000_0000_0000_0001);
pub const COMPETITION_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0003_4000_8000_0000_0000_0001);
pub const EVENT_ADULT_BRONZE_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0004_4000_8000_0000_0000_0001);
pub const EVENT_JUVENILE_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0004_4000_8000_0000_0000_0002);
pub const EVENT_PRE_ALPHA_ID: Uuid = Uuid::from_u128(0x0c6e_7a10_0004_4000_8000_0000_0000_0003);

/// Rows actually written by one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub clubs: u64,
    pub competitions: u64,
    pub events: u64,
    pub registrations: u64,
}

struct SeedUser {
    id: Uuid,
    email: &'static str,
    name: &'static str,
    role: &'static str,
}

struct SeedEvent {
    id: Uuid,
    name: &'static str,
    category: &'static str,
    age_group: &'static str,
    level: &'static str,
    entry_fee: Decimal,
    max_entries: i32,
    description: &'static str,
    requirements: &'static str,
}

fn users() -> [SeedUser; 4] {
    [
        SeedUser {
            id: ORGANIZER_ID,
            email: "sarah@example.com",
            name: "Sarah Johnson",
            role: "ORGANIZER",
        },
        SeedUser {
            id: SKATER_EMMA_ID,
            email: "emma@example.com",
            name: "Emma Wilson",
            role: "SKATER",
        },
        SeedUser {
            id: SKATER_MICHAEL_ID,
            email: "michael@example.com",
            name: "Michael Chen",
            role: "SKATER",
        },
        SeedUser {
            id: COACH_ID,
            email: "coach@example.com",
            name: "David Thompson",
            role: "COACH",
        },
    ]
}

fn events() -> [SeedEvent; 3] {
    [
        SeedEvent {
            id: EVENT_ADULT_BRONZE_ID,
            name: "Adult Bronze Freestyle",
            category: "Freestyle",
            age_group: "Adult Bronze (18+)",
            level: "Bronze",
            entry_fee: Decimal::new(7500, 2),
            max_entries: 20,
            description: "Freestyle program for adult bronze level skaters. Program length: 1 minute 30 seconds.",
            requirements: "Must have passed Adult Bronze moves in the field test",
        },
        SeedEvent {
            id: EVENT_JUVENILE_ID,
            name: "Juvenile Ladies Freestyle",
            category: "Freestyle",
            age_group: "Juvenile",
            level: "Juvenile",
            entry_fee: Decimal::new(8500, 2),
            max_entries: 15,
            description: "Freestyle program for juvenile level ladies. Program length: 2 minutes.",
            requirements: "Must have passed Juvenile moves in the field test",
        },
        SeedEvent {
            id: EVENT_PRE_ALPHA_ID,
            name: "Pre-Alpha Moves in the Field",
            category: "Moves in the Field",
            age_group: "Pre-Alpha (4-5)",
            level: "Pre-Alpha",
            entry_fee: Decimal::new(4500, 2),
            max_entries: 25,
            description: "Moves in the field test for pre-alpha level skaters.",
            requirements: "No prerequisites required",
        },
    ]
}

/// Load the demo fixture in a single transaction
pub async fn seed_demo_data(pool: &PgPool) -> Result<SeedReport> {
    let mut tx = pool.begin().await?;
    let report = insert_fixture(&mut *tx).await?;
    tx.commit().await?;

    Ok(report)
}

async fn insert_fixture(conn: &mut PgConnection) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for user in users() {
        report.users += sqlx::query(
            r#"
            INSERT INTO users (id, email, name, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(user.email)
        .bind(user.name)
        .bind(user.role)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    report.clubs += sqlx::query(
        "INSERT INTO clubs (id, name) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(CLUB_ID)
    .bind("Ice City Skating Club")
    .execute(&mut *conn)
    .await?
    .rows_affected();

    report.competitions += sqlx::query(
        r#"
        INSERT INTO competitions (
            id, name, description, start_date, end_date, venue, address, status,
            organizer_id, club_id
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'REGISTRATION_OPEN', $8, $9)
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(COMPETITION_ID)
    .bind("Spring Figure Skating Championship 2025")
    .bind("Join us for the premier figure skating competition of the spring season. Open to all levels from beginner to advanced.")
    .bind(NaiveDate::from_ymd_opt(2025, 3, 15))
    .bind(NaiveDate::from_ymd_opt(2025, 3, 17))
    .bind("Olympic Ice Arena")
    .bind("123 Championship Drive, Ice City, IC 12345")
    .bind(ORGANIZER_ID)
    .bind(CLUB_ID)
    .execute(&mut *conn)
    .await?
    .rows_affected();

    for event in events() {
        report.events += sqlx::query(
            r#"
            INSERT INTO events (
                id, competition_id, name, category, age_group, level, entry_fee,
                max_entries, description, requirements
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event.id)
        .bind(COMPETITION_ID)
        .bind(event.name)
        .bind(event.category)
        .bind(event.age_group)
        .bind(event.level)
        .bind(event.entry_fee)
        .bind(event.max_entries)
        .bind(event.description)
        .bind(event.requirements)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    let registrations = [
        (
            Uuid::from_u128(0x0c6e_7a10_0005_4000_8000_0000_0000_0001),
            EVENT_ADULT_BRONZE_ID,
            SKATER_EMMA_ID,
            "First time competing at this level",
        ),
        (
            Uuid::from_u128(0x0c6e_7a10_0005_4000_8000_0000_0000_0002),
            EVENT_JUVENILE_ID,
            SKATER_MICHAEL_ID,
            "Looking forward to the competition!",
        ),
    ];

    for (id, event_id, skater_id, notes) in registrations {
        report.registrations += sqlx::query(
            r#"
            INSERT INTO registrations (id, event_id, skater_id, competition_id, notes)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(event_id)
        .bind(skater_id)
        .bind(COMPETITION_ID)
        .bind(notes)
        .execute(&mut *conn)
        .await?
        .rows_affected();
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_fixture_ids_are_distinct() {
        let ids: HashSet<Uuid> = users()
            .iter()
            .map(|u| u.id)
            .chain(events().iter().map(|e| e.id))
            .chain([CLUB_ID, COMPETITION_ID])
            .collect();

        assert_eq!(ids.len(), 9);
    }

    #[test]
    fn test_fixture_roles_and_fees_are_valid() {
        for user in users() {
            assert!(crate::dto::user::USER_ROLES.contains(&user.role));
        }
        for event in events() {
            assert!(event.entry_fee > Decimal::ZERO);
            assert!(event.max_entries > 0);
        }
    }
}
