//! Task data structures.
//!
//! This module defines the persisted `Task` record, the `NewTask` payload
//! handed to the store on creation, and `TaskDraft`, the raw form input that
//! is validated before anything reaches the store.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::dates::parse_due_input_from;
use crate::fields::Category;

/// Opaque task identifier.
pub type TaskId = Uuid;

/// A single trackable to-do item.
///
/// Field names are serialised in camelCase; the stored blob is a JSON array
/// of these records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub category: Category,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// A task payload without identity, as accepted by `TaskStore::add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub category: Category,
    pub due_date: NaiveDate,
    pub completed: bool,
}

impl NewTask {
    pub fn new(description: impl Into<String>, category: Category, due_date: NaiveDate) -> Self {
        NewTask {
            description: description.into(),
            category,
            due_date,
            completed: false,
        }
    }

    /// Attach a fresh identity and creation timestamp.
    pub fn into_task(self, id: TaskId, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            description: self.description,
            category: self.category,
            due_date: self.due_date,
            completed: self.completed,
            created_at,
        }
    }
}

/// Rejections raised at the entry form boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Description is required.")]
    EmptyDescription,
    #[error("Due date is required.")]
    MissingDueDate,
    #[error("Unrecognised due date '{0}' (try YYYY-MM-DD, today, tomorrow or in 3d)")]
    InvalidDueDate(String),
}

/// Unvalidated form input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub description: String,
    pub category: Category,
    pub due: String,
}

impl TaskDraft {
    /// Check required fields and parse the due date relative to `today`.
    ///
    /// The description is stored trimmed.
    pub fn validate(&self, today: NaiveDate) -> Result<NewTask, ValidationError> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let due = self.due.trim();
        if due.is_empty() {
            return Err(ValidationError::MissingDueDate);
        }
        let due_date = parse_due_input_from(due, today)
            .ok_or_else(|| ValidationError::InvalidDueDate(due.to_string()))?;
        Ok(NewTask::new(description, self.category, due_date))
    }

    /// Validate and apply the draft onto an existing task, keeping its identity,
    /// creation time and completion flag.
    pub fn apply_to(&self, task: &Task, today: NaiveDate) -> Result<Task, ValidationError> {
        let fields = self.validate(today)?;
        Ok(Task {
            description: fields.description,
            category: fields.category,
            due_date: fields.due_date,
            ..task.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn draft(desc: &str, due: &str) -> TaskDraft {
        TaskDraft {
            description: desc.to_string(),
            category: Category::Work,
            due: due.to_string(),
        }
    }

    #[test]
    fn test_validate_accepts_complete_draft() {
        let t = draft("  Write report ", "2024-01-12").validate(today()).unwrap();
        assert_eq!(t.description, "Write report");
        assert_eq!(t.category, Category::Work);
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2024, 1, 12).unwrap());
        assert!(!t.completed);
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        assert_eq!(draft("   ", "today").validate(today()), Err(ValidationError::EmptyDescription));
        assert_eq!(draft("Call bank", "").validate(today()), Err(ValidationError::MissingDueDate));
        assert_eq!(
            draft("Call bank", "soonish").validate(today()),
            Err(ValidationError::InvalidDueDate("soonish".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_out_of_range_relative_due() {
        for due in ["in 100000000d", "in 999999999999999w"] {
            assert_eq!(
                draft("Far future", due).validate(today()),
                Err(ValidationError::InvalidDueDate(due.to_string()))
            );
        }
    }

    #[test]
    fn test_apply_preserves_identity() {
        let created_at = Utc::now();
        let mut original = NewTask::new("Old", Category::Personal, today()).into_task(Uuid::new_v4(), created_at);
        original.completed = true;

        let updated = draft("New", "tomorrow").apply_to(&original, today()).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, created_at);
        assert!(updated.completed);
        assert_eq!(updated.description, "New");
        assert_eq!(updated.category, Category::Work);
    }

    #[test]
    fn test_task_json_field_names() {
        let task = NewTask::new("Buy milk", Category::Personal, today())
            .into_task(Uuid::nil(), Utc::now());
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["dueDate"], "2024-01-10");
        assert_eq!(value["category"], "Personal");
        assert_eq!(value["completed"], false);
        assert!(value.get("createdAt").is_some());
    }
}
