//! Admission of a skater into an event.
//!
//! The decision runs against [`AdmissionStore`], which only needs three
//! primitives: find a registration by (event, skater), read an event's
//! capacity with its live registration count, and insert a registration.
//! The checks always run in the same order: duplicate, missing event,
//! competition mismatch, capacity.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::Registration;

/// A registration that passed input validation but not yet admission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub event_id: Uuid,
    pub skater_id: Uuid,
    pub competition_id: Uuid,
    pub notes: Option<String>,
}

/// Capacity of an event as read at admission time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCapacity {
    pub competition_id: Uuid,
    pub max_entries: Option<i32>,
    pub registration_count: i64,
}

impl EventCapacity {
    pub fn is_full(&self) -> bool {
        self.max_entries
            .is_some_and(|max| self.registration_count >= i64::from(max))
    }

    /// Spots left, or `None` for an event without an entry limit
    pub fn spots_remaining(&self) -> Option<i64> {
        self.max_entries
            .map(|max| (i64::from(max) - self.registration_count).max(0))
    }
}

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("Skater is already registered for this event")]
    AlreadyRegistered,

    #[error("Event not found")]
    EventNotFound,

    #[error("Event does not belong to this competition")]
    CompetitionMismatch,

    #[error("Event is full")]
    EventFull,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Data access needed by [`admit`]
#[async_trait]
pub trait AdmissionStore: Send {
    async fn find_registration(
        &mut self,
        event_id: Uuid,
        skater_id: Uuid,
    ) -> crate::error::Result<Option<Registration>>;

    async fn event_capacity(
        &mut self,
        event_id: Uuid,
    ) -> crate::error::Result<Option<EventCapacity>>;

    /// Must report a duplicate (event, skater) pair as
    /// [`StorageError::ConstraintViolation`].
    async fn insert_registration(
        &mut self,
        registration: &NewRegistration,
    ) -> crate::error::Result<Registration>;
}

/// Decide whether `request` may be committed and insert it if so
pub async fn admit<S>(
    store: &mut S,
    request: &NewRegistration,
) -> Result<Registration, AdmissionError>
where
    S: AdmissionStore + ?Sized,
{
    if store
        .find_registration(request.event_id, request.skater_id)
        .await?
        .is_some()
    {
        return Err(AdmissionError::AlreadyRegistered);
    }

    let capacity = store
        .event_capacity(request.event_id)
        .await?
        .ok_or(AdmissionError::EventNotFound)?;

    if capacity.competition_id != request.competition_id {
        return Err(AdmissionError::CompetitionMismatch);
    }

    if capacity.is_full() {
        return Err(AdmissionError::EventFull);
    }

    store
        .insert_registration(request)
        .await
        .map_err(|e| match e {
            StorageError::ConstraintViolation(_) => AdmissionError::AlreadyRegistered,
            other => AdmissionError::Storage(other),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    struct EventRow {
        competition_id: Uuid,
        max_entries: Option<i32>,
    }

    #[derive(Default)]
    struct MemoryStore {
        events: HashMap<Uuid, EventRow>,
        registrations: Vec<Registration>,
        /// Pretends a concurrent request inserted the same pair after the
        /// duplicate lookup ran.
        lose_insert_race: bool,
        fail_lookups: bool,
    }

    impl MemoryStore {
        fn with_event(mut self, event_id: Uuid, competition_id: Uuid, max_entries: Option<i32>) -> Self {
            self.events.insert(
                event_id,
                EventRow {
                    competition_id,
                    max_entries,
                },
            );
            self
        }

        fn count_for(&self, event_id: Uuid) -> usize {
            self.registrations
                .iter()
                .filter(|r| r.event_id == event_id)
                .count()
        }
    }

    #[async_trait]
    impl AdmissionStore for MemoryStore {
        async fn find_registration(
            &mut self,
            event_id: Uuid,
            skater_id: Uuid,
        ) -> crate::error::Result<Option<Registration>> {
            if self.fail_lookups {
                return Err(StorageError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(self
                .registrations
                .iter()
                .find(|r| r.event_id == event_id && r.skater_id == skater_id)
                .cloned())
        }

        async fn event_capacity(
            &mut self,
            event_id: Uuid,
        ) -> crate::error::Result<Option<EventCapacity>> {
            let registration_count = self.count_for(event_id) as i64;
            Ok(self.events.get(&event_id).map(|row| EventCapacity {
                competition_id: row.competition_id,
                max_entries: row.max_entries,
                registration_count,
            }))
        }

        async fn insert_registration(
            &mut self,
            registration: &NewRegistration,
        ) -> crate::error::Result<Registration> {
            if self.lose_insert_race {
                return Err(StorageError::ConstraintViolation(
                    "registration already exists".to_string(),
                ));
            }
            let created = Registration {
                id: Uuid::new_v4(),
                event_id: registration.event_id,
                skater_id: registration.skater_id,
                competition_id: registration.competition_id,
                notes: registration.notes.clone(),
                created_at: chrono::Utc::now().naive_utc(),
            };
            self.registrations.push(created.clone());
            Ok(created)
        }
    }

    fn request(event_id: Uuid, skater_id: Uuid, competition_id: Uuid) -> NewRegistration {
        NewRegistration {
            event_id,
            skater_id,
            competition_id,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_single_spot_event_scenario() {
        let (competition, event) = (Uuid::new_v4(), Uuid::new_v4());
        let (s1, s2) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = MemoryStore::default().with_event(event, competition, Some(1));

        let created = admit(&mut store, &request(event, s1, competition))
            .await
            .unwrap();
        assert_eq!(created.event_id, event);
        assert_eq!(created.skater_id, s1);
        assert_eq!(created.competition_id, competition);
        assert_eq!(store.count_for(event), 1);

        let duplicate = admit(&mut store, &request(event, s1, competition)).await;
        assert!(matches!(duplicate, Err(AdmissionError::AlreadyRegistered)));

        let full = admit(&mut store, &request(event, s2, competition)).await;
        assert!(matches!(full, Err(AdmissionError::EventFull)));
        assert_eq!(store.count_for(event), 1);
    }

    #[tokio::test]
    async fn test_unlimited_event_accepts_every_skater() {
        let (competition, event) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = MemoryStore::default().with_event(event, competition, None);

        for _ in 0..50 {
            admit(&mut store, &request(event, Uuid::new_v4(), competition))
                .await
                .unwrap();
        }

        assert_eq!(store.count_for(event), 50);
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let mut store = MemoryStore::default();

        let result = admit(
            &mut store,
            &request(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

        assert!(matches!(result, Err(AdmissionError::EventNotFound)));
        assert!(store.registrations.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_wins_over_full() {
        let (competition, event, skater) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut store = MemoryStore::default().with_event(event, competition, Some(2));
        admit(&mut store, &request(event, skater, competition))
            .await
            .unwrap();
        admit(&mut store, &request(event, Uuid::new_v4(), competition))
            .await
            .unwrap();

        let result = admit(&mut store, &request(event, skater, competition)).await;

        assert!(matches!(result, Err(AdmissionError::AlreadyRegistered)));
        assert_eq!(store.count_for(event), 2);
    }

    #[tokio::test]
    async fn test_same_skater_may_enter_several_events() {
        let (competition, skater) = (Uuid::new_v4(), Uuid::new_v4());
        let (freestyle, moves) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = MemoryStore::default()
            .with_event(freestyle, competition, Some(1))
            .with_event(moves, competition, Some(1));

        admit(&mut store, &request(freestyle, skater, competition))
            .await
            .unwrap();
        admit(&mut store, &request(moves, skater, competition))
            .await
            .unwrap();

        assert_eq!(store.registrations.len(), 2);
    }

    #[tokio::test]
    async fn test_event_from_other_competition_is_rejected() {
        let event = Uuid::new_v4();
        let mut store = MemoryStore::default().with_event(event, Uuid::new_v4(), None);

        let result = admit(
            &mut store,
            &request(event, Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

        assert!(matches!(result, Err(AdmissionError::CompetitionMismatch)));
        assert!(store.registrations.is_empty());
    }

    #[tokio::test]
    async fn test_unique_violation_on_insert_reads_as_duplicate() {
        let (competition, event) = (Uuid::new_v4(), Uuid::new_v4());
        let mut store = MemoryStore {
            lose_insert_race: true,
            ..Default::default()
        }
        .with_event(event, competition, None);

        let result = admit(&mut store, &request(event, Uuid::new_v4(), competition)).await;

        assert!(matches!(result, Err(AdmissionError::AlreadyRegistered)));
    }

    #[tokio::test]
    async fn test_storage_failure_is_passed_through() {
        let mut store = MemoryStore {
            fail_lookups: true,
            ..Default::default()
        };

        let result = admit(
            &mut store,
            &request(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()),
        )
        .await;

        assert!(matches!(result, Err(AdmissionError::Storage(_))));
    }

    #[test]
    fn test_capacity_arithmetic() {
        let capacity = EventCapacity {
            competition_id: Uuid::new_v4(),
            max_entries: Some(20),
            registration_count: 19,
        };
        assert!(!capacity.is_full());
        assert_eq!(capacity.spots_remaining(), Some(1));

        let full = EventCapacity {
            registration_count: 20,
            ..capacity
        };
        assert!(full.is_full());
        assert_eq!(full.spots_remaining(), Some(0));

        let unlimited = EventCapacity {
            max_entries: None,
            registration_count: 10_000,
            ..capacity
        };
        assert!(!unlimited.is_full());
        assert_eq!(unlimited.spots_remaining(), None);
    }
}
