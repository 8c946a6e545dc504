use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type CategoryId = i64;
pub type PriorityId = i64;
pub type TaskId = i64;

/// Grouping label applied to tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Ordered urgency label; a higher rank is more urgent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub id: PriorityId,
    pub name: String,
    pub rank: i64,
}

/// A unit of work with a due time and completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub due_at: DateTime<Utc>,
    pub is_done: bool,
    pub category_id: Option<CategoryId>,
    pub priority_id: Option<PriorityId>,
    /// Set once a reminder has been dispatched for the current `due_at`
    pub reminder_sent: bool,
}

/// A task joined with the names of its category and priority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub category: Option<String>,
    pub priority: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpdate {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewPriority {
    pub name: String,
    #[serde(default)]
    pub rank: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriorityUpdate {
    pub name: Option<String>,
    pub rank: Option<i64>,
}

/// Request to create a task.
///
/// `due_at` defaults to one day after creation when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_due_at")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub priority_id: Option<PriorityId>,
}

/// Partial update of a task.
///
/// Absent fields are left untouched. For the nullable columns an explicit
/// JSON `null` clears the value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_due_at")]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_done: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default, deserialize_with = "double_option")]
    pub priority_id: Option<Option<PriorityId>>,
}

/// Parse a due date given either as RFC 3339 or as `YYYY-MM-DD HH:MM:SS` (UTC).
///
/// # Errors
///
/// Returns a description of the accepted formats if neither parses.
pub fn parse_due_at(raw: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            format!("invalid due_at `{raw}`: expected RFC 3339 or YYYY-MM-DD HH:MM:SS")
        })
}

fn deserialize_due_at<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_due_at(&s).map_err(serde::de::Error::custom))
        .transpose()
}

// Distinguishes a missing field (outer None, via `default`) from an explicit null.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_due_at_accepts_both_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(parse_due_at("2024-03-01T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_due_at("2024-03-01T11:30:00+02:00").unwrap(), expected);
        assert_eq!(parse_due_at("2024-03-01 09:30:00").unwrap(), expected);
        assert!(parse_due_at("tomorrow").is_err());
    }

    #[test]
    fn test_task_update_distinguishes_null_from_missing() {
        let update: TaskUpdate =
            serde_json::from_str(r#"{"description": null, "is_done": true}"#).unwrap();
        assert_eq!(update.description, Some(None));
        assert_eq!(update.category_id, None);
        assert_eq!(update.is_done, Some(true));

        let update: TaskUpdate = serde_json::from_str(r#"{"category_id": 4}"#).unwrap();
        assert_eq!(update.category_id, Some(Some(4)));
        assert_eq!(update.description, None);
    }

    #[test]
    fn test_new_task_defaults() {
        let task: NewTask = serde_json::from_str(r#"{"title": "Write report"}"#).unwrap();
        assert_eq!(task.title, "Write report");
        assert!(task.due_at.is_none());
        assert!(!task.is_done);
        assert!(task.category_id.is_none());
    }

    #[test]
    fn test_task_view_flattens_task_fields() {
        let view = TaskView {
            task: Task {
                id: 7,
                title: "X".to_string(),
                description: None,
                due_at: Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap(),
                is_done: false,
                category_id: Some(1),
                priority_id: None,
                reminder_sent: false,
            },
            category: Some("Work".to_string()),
            priority: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "X");
        assert_eq!(json["category"], "Work");
        assert!(json["priority"].is_null());
    }
}
