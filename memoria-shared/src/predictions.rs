/// Suggested reminders
///
/// Placeholder heuristic: every reminder that is not done is suggested again.
/// Nothing is learned or stored.

use crate::models::reminder::Reminder;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const RETRY_PREFIX: &str = "Retry: ";
const NOT_DONE_REASON: &str = "Not done yet";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub suggested_title: String,

    /// Always empty for now
    pub date: Option<NaiveDateTime>,

    pub reason: String,
}

/// Response body of the predictions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Predictions {
    pub suggested_reminders: Vec<Suggestion>,
}

/// One retry suggestion per unfinished reminder, in input order
pub fn suggest_retries(reminders: &[Reminder]) -> Vec<Suggestion> {
    reminders
        .iter()
        .filter(|r| !r.is_done())
        .map(|r| Suggestion {
            suggested_title: format!("{RETRY_PREFIX}{}", r.title),
            date: None,
            reason: NOT_DONE_REASON.to_string(),
        })
        .collect()
}

pub async fn predictions_for_user(pool: &PgPool, user_id: i64) -> Result<Predictions, sqlx::Error> {
    let reminders = Reminder::list_by_user(pool, user_id).await?;
    Ok(Predictions {
        suggested_reminders: suggest_retries(&reminders),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reminder(title: &str, status: &str) -> Reminder {
        Reminder {
            id: 1,
            user_id: 1,
            title: title.to_string(),
            description: None,
            date: None,
            time: None,
            recurrence: None,
            status: status.to_string(),
            priority: "normal".to_string(),
            parent_event_id: None,
        }
    }

    #[test]
    fn test_only_unfinished_reminders_are_suggested() {
        let suggestions = suggest_retries(&[
            reminder("Call mom", "pending"),
            reminder("Pay rent", "done"),
            reminder("Renew passport", "snoozed"),
        ]);

        let titles: Vec<&str> = suggestions.iter().map(|s| s.suggested_title.as_str()).collect();
        assert_eq!(titles, vec!["Retry: Call mom", "Retry: Renew passport"]);
        assert!(suggestions.iter().all(|s| s.date.is_none()));
        assert!(suggestions.iter().all(|s| s.reason == "Not done yet"));
    }

    #[test]
    fn test_serialized_shape() {
        let predictions = Predictions {
            suggested_reminders: suggest_retries(&[reminder("Stretch", "pending")]),
        };

        let json = serde_json::to_value(&predictions).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "suggested_reminders": [
                    { "suggested_title": "Retry: Stretch", "date": null, "reason": "Not done yet" }
                ]
            })
        );
    }
}
