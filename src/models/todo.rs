use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Canonical todo record. Field names follow the JSON wire format the web
/// client speaks, so everything serializes camelCase with optional fields
/// omitted rather than null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "optional_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Create payload: the full record minus `id` and `createdAt`, which are
/// assigned server-side. Timestamps are stamped at creation and never read
/// from the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodoRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, deserialize_with = "optional_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

/// Partial update payload: only supplied fields are applied, everything
/// else keeps its stored value. `updatedAt` is recomputed at apply time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "optional_date")]
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<Priority>,
}

impl NewTodoRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        check_title(&self.title, &mut errors);
        if let Some(description) = &self.description {
            check_description(description, &mut errors);
        }
        errors.into_result()
    }
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        if let Some(title) = &self.title {
            check_title(title, &mut errors);
        }
        if let Some(description) = &self.description {
            check_description(description, &mut errors);
        }
        errors.into_result()
    }
}

fn check_title(title: &str, errors: &mut ValidationError) {
    if title.is_empty() {
        errors.add("title", "must not be empty");
    } else if title.chars().count() > TITLE_MAX_CHARS {
        errors.add(
            "title",
            format!("must be at most {TITLE_MAX_CHARS} characters"),
        );
    }
}

fn check_description(description: &str, errors: &mut ValidationError) {
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        errors.add(
            "description",
            format!("must be at most {DESCRIPTION_MAX_CHARS} characters"),
        );
    }
}

// Due dates arrive either as a full RFC 3339 timestamp or as a bare
// `YYYY-MM-DD` from a date picker; the bare form means midnight UTC.
fn optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(None),
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(Some(date.and_time(NaiveTime::MIN).and_utc()));
    }

    Err(serde::de::Error::custom(format!("invalid date: {raw}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_todo() -> Todo {
        let stamp = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        Todo {
            id: "a1b2c3".to_string(),
            title: "Buy milk".to_string(),
            description: Some("2%".to_string()),
            completed: false,
            created_at: stamp,
            updated_at: stamp,
            due_date: Some(Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap()),
            priority: Some(Priority::High),
        }
    }

    #[test]
    fn todo_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample_todo()).unwrap();
        assert_eq!(json["id"], "a1b2c3");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["description"], "2%");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["updatedAt"], "2026-01-02T03:04:05Z");
        assert_eq!(json["dueDate"], "2026-01-10T00:00:00Z");
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let todo = Todo {
            description: None,
            due_date: None,
            priority: None,
            ..sample_todo()
        };
        let json = serde_json::to_value(todo).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("description"));
        assert!(!object.contains_key("dueDate"));
        assert!(!object.contains_key("priority"));
    }

    #[test]
    fn todo_roundtrips_through_json() {
        let todo = sample_todo();
        let encoded = serde_json::to_string(&todo).unwrap();
        let back: Todo = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, todo);
    }

    #[test]
    fn new_request_defaults_completed_to_false() {
        let req: NewTodoRequest = serde_json::from_str(r#"{"title":"Walk dog"}"#).unwrap();
        assert_eq!(req.title, "Walk dog");
        assert!(!req.completed);
        assert!(req.description.is_none());
        assert!(req.due_date.is_none());
        assert!(req.priority.is_none());
    }

    #[test]
    fn new_request_requires_title() {
        let result: Result<NewTodoRequest, _> = serde_json::from_str(r#"{"completed":true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn new_request_rejects_unknown_priority() {
        let result: Result<NewTodoRequest, _> =
            serde_json::from_str(r#"{"title":"x","priority":"urgent"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn due_date_accepts_rfc3339() {
        let req: NewTodoRequest =
            serde_json::from_str(r#"{"title":"x","dueDate":"2026-01-10T12:30:00+02:00"}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 1, 10, 10, 30, 0).unwrap();
        assert_eq!(req.due_date, Some(expected));
    }

    #[test]
    fn due_date_accepts_bare_date_as_midnight_utc() {
        let req: NewTodoRequest =
            serde_json::from_str(r#"{"title":"x","dueDate":"2026-01-10"}"#).unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(req.due_date, Some(expected));
    }

    #[test]
    fn due_date_rejects_malformed_input() {
        let result: Result<NewTodoRequest, _> =
            serde_json::from_str(r#"{"title":"x","dueDate":"next tuesday"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn update_request_all_fields_optional() {
        let req: UpdateTodoRequest = serde_json::from_str("{}").unwrap();
        assert!(req.title.is_none());
        assert!(req.description.is_none());
        assert!(req.completed.is_none());
        assert!(req.due_date.is_none());
        assert!(req.priority.is_none());
    }

    #[test]
    fn validate_rejects_empty_title() {
        let req = NewTodoRequest {
            title: String::new(),
            description: None,
            completed: false,
            due_date: None,
            priority: None,
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "title");
    }

    #[test]
    fn validate_enforces_title_length_limit() {
        let mut req = NewTodoRequest {
            title: "x".repeat(TITLE_MAX_CHARS),
            description: None,
            completed: false,
            due_date: None,
            priority: None,
        };
        assert!(req.validate().is_ok());

        req.title.push('x');
        let err = req.validate().unwrap_err();
        assert_eq!(err.violations[0].field, "title");
    }

    #[test]
    fn validate_enforces_description_length_limit() {
        let mut req = NewTodoRequest {
            title: "ok".to_string(),
            description: Some("d".repeat(DESCRIPTION_MAX_CHARS)),
            completed: false,
            due_date: None,
            priority: None,
        };
        assert!(req.validate().is_ok());

        req.description = Some("d".repeat(DESCRIPTION_MAX_CHARS + 1));
        let err = req.validate().unwrap_err();
        assert_eq!(err.violations[0].field, "description");
    }

    #[test]
    fn validate_collects_every_violation() {
        let req = NewTodoRequest {
            title: String::new(),
            description: Some("d".repeat(DESCRIPTION_MAX_CHARS + 1)),
            completed: false,
            due_date: None,
            priority: None,
        };
        let err = req.validate().unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["title", "description"]);
    }

    #[test]
    fn update_validate_checks_only_supplied_fields() {
        assert!(UpdateTodoRequest::default().validate().is_ok());

        let req = UpdateTodoRequest {
            title: Some(String::new()),
            ..Default::default()
        };
        let err = req.validate().unwrap_err();
        assert_eq!(err.violations[0].field, "title");
    }
}
