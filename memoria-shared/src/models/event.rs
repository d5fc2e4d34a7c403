/// Event model and database operations
///
/// Events group reminders: a reminder points at its event through
/// `reminders.parent_event_id`. Creating an event links the requested
/// reminders in the same transaction as the insert, and only reminders owned
/// by the event's user are linked. Anything else is reported back as skipped.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE events (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id),
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     date TIMESTAMP,
///     time VARCHAR(10)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use memoria_shared::models::event::{CreateEvent, Event};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let created = Event::create(
///     &pool,
///     1,
///     CreateEvent {
///         title: "Trip".to_string(),
///         reminder_ids: vec![4, 5],
///         ..Default::default()
///     },
/// )
/// .await?;
///
/// for id in &created.skipped_reminder_ids {
///     println!("reminder {id} was not linked");
/// }
/// # Ok(())
/// # }
/// ```

use crate::models::reminder::Reminder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const COLUMNS: &str = "id, user_id, title, description, date, time";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub time: Option<String>,
}

/// Input for [`Event::create`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub time: Option<String>,

    /// Reminders to hang off the new event
    pub reminder_ids: Vec<i64>,
}

/// An event together with the reminders linked to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventWithReminders {
    #[serde(flatten)]
    pub event: Event,

    pub reminders: Vec<Reminder>,
}

/// Result of [`Event::create`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedEvent {
    #[serde(flatten)]
    pub event: Event,

    pub reminders: Vec<Reminder>,

    /// Requested reminder ids that were missing or owned by another user
    pub skipped_reminder_ids: Vec<i64>,
}

impl Event {
    /// Inserts an event for `user_id` and links the owned reminders it names
    ///
    /// Insert and linking commit together. Missing or foreign reminder ids do
    /// not fail the call; they come back in `skipped_reminder_ids`.
    pub async fn create(
        pool: &PgPool,
        user_id: i64,
        data: CreateEvent,
    ) -> Result<CreatedEvent, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (user_id, title, description, date, time)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.date)
        .bind(data.time)
        .fetch_one(&mut *tx)
        .await?;

        let requested = dedup_ids(&data.reminder_ids);
        let linked = if requested.is_empty() {
            Vec::new()
        } else {
            Reminder::attach_to_event(&mut *tx, event.id, user_id, &requested).await?
        };
        let reminders = Reminder::list_by_events(&mut *tx, &[event.id]).await?;

        tx.commit().await?;

        let skipped_reminder_ids = skipped_ids(&requested, &linked);
        if !skipped_reminder_ids.is_empty() {
            debug!(
                event_id = event.id,
                user_id,
                skipped = ?skipped_reminder_ids,
                "Some reminders were not linked to the new event"
            );
        }

        Ok(CreatedEvent {
            event,
            reminders,
            skipped_reminder_ids,
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Event>(&format!("SELECT {COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All events of a user, each with its linked reminders
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: i64,
    ) -> Result<Vec<EventWithReminders>, sqlx::Error> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {COLUMNS} FROM events WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        if events.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        let reminders = Reminder::list_by_events(pool, &ids).await?;

        Ok(attach_reminders(events, reminders))
    }
}

/// Drops repeated ids, keeping first-seen order
fn dedup_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Ids from `requested` that are absent from `linked`, in request order
fn skipped_ids(requested: &[i64], linked: &[i64]) -> Vec<i64> {
    let linked: HashSet<i64> = linked.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !linked.contains(id))
        .collect()
}

fn attach_reminders(events: Vec<Event>, reminders: Vec<Reminder>) -> Vec<EventWithReminders> {
    let mut by_event: HashMap<i64, Vec<Reminder>> = HashMap::new();
    for reminder in reminders {
        if let Some(event_id) = reminder.parent_event_id {
            by_event.entry(event_id).or_default().push(reminder);
        }
    }

    events
        .into_iter()
        .map(|event| EventWithReminders {
            reminders: by_event.remove(&event.id).unwrap_or_default(),
            event,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reminder::{DEFAULT_PRIORITY, DEFAULT_STATUS};

    fn event(id: i64) -> Event {
        Event {
            id,
            user_id: 1,
            title: format!("event {id}"),
            description: None,
            date: None,
            time: None,
        }
    }

    fn reminder(id: i64, parent: Option<i64>) -> Reminder {
        Reminder {
            id,
            user_id: 1,
            title: format!("reminder {id}"),
            description: None,
            date: None,
            time: None,
            recurrence: None,
            status: DEFAULT_STATUS.to_string(),
            priority: DEFAULT_PRIORITY.to_string(),
            parent_event_id: parent,
        }
    }

    #[test]
    fn test_skipped_ids_reports_unlinked_in_request_order() {
        assert_eq!(skipped_ids(&[3, 1, 2], &[1]), vec![3, 2]);
        assert!(skipped_ids(&[1, 2], &[2, 1]).is_empty());
        assert!(skipped_ids(&[], &[]).is_empty());
    }

    #[test]
    fn test_dedup_ids_keeps_first_occurrence() {
        assert_eq!(dedup_ids(&[5, 1, 5, 2, 1]), vec![5, 1, 2]);
    }

    #[test]
    fn test_attach_reminders_groups_by_parent() {
        let grouped = attach_reminders(
            vec![event(10), event(20)],
            vec![reminder(1, Some(10)), reminder(2, Some(20)), reminder(3, Some(10))],
        );

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].event.id, 10);
        let ids: Vec<i64> = grouped[0].reminders.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(grouped[1].reminders.len(), 1);
    }

    #[test]
    fn test_event_without_reminders_gets_empty_list() {
        let grouped = attach_reminders(vec![event(1)], vec![reminder(9, None)]);
        assert!(grouped[0].reminders.is_empty());
    }

    #[test]
    fn test_created_event_serializes_flat() {
        let created = CreatedEvent {
            event: event(4),
            reminders: vec![reminder(1, Some(4))],
            skipped_reminder_ids: vec![99],
        };

        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["id"], 4);
        assert_eq!(json["title"], "event 4");
        assert_eq!(json["reminders"][0]["parent_event_id"], 4);
        assert_eq!(json["skipped_reminder_ids"], serde_json::json!([99]));
    }
}
