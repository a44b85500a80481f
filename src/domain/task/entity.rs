//! Task entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_task_title, TaskValidationError};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;

/// Task identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier from its string form
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TaskId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workflow status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Parse a status from its wire form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(Self::Todo),
            "in_progress" => Some(Self::InProgress),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Todo => write!(f, "todo"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    id: TaskId,
    /// Owning team
    team_id: TeamId,
    /// Short title
    title: String,
    /// Longer description
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    /// Current status
    status: TaskStatus,
    /// Optional due date
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<DateTime<Utc>>,
    /// User who created the task
    created_by: UserId,
    /// User the task is assigned to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    assigned_to: Option<UserId>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task
    pub fn new(
        team_id: TeamId,
        title: impl Into<String>,
        created_by: UserId,
    ) -> Result<Self, TaskValidationError> {
        let title = title.into();
        validate_task_title(&title)?;
        let now = Utc::now();

        Ok(Self {
            id: TaskId::new(),
            team_id,
            title,
            description: None,
            status: TaskStatus::Todo,
            due_date: None,
            created_by,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a task from stored fields, preserving timestamps
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: TaskId,
        team_id: TeamId,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        due_date: Option<DateTime<Utc>>,
        created_by: UserId,
        assigned_to: Option<UserId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            team_id,
            title,
            description,
            status,
            due_date,
            created_by,
            assigned_to,
            created_at,
            updated_at,
        }
    }

    /// Set description (builder pattern)
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set status (builder pattern)
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Set due date (builder pattern)
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set assignee (builder pattern)
    pub fn with_assignee(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    // Getters

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn team_id(&self) -> TeamId {
        self.team_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    pub fn created_by(&self) -> UserId {
        self.created_by
    }

    pub fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update the title
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), TaskValidationError> {
        let title = title.into();
        validate_task_title(&title)?;
        self.title = title;
        self.touch();
        Ok(())
    }

    /// Update the description
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.touch();
    }

    /// Update the status
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.touch();
    }

    /// Update the due date
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>) {
        self.due_date = due_date;
        self.touch();
    }

    /// Update the assignee; `None` unassigns
    pub fn set_assignee(&mut self, user_id: Option<UserId>) {
        self.assigned_to = user_id;
        self.touch();
    }

    /// Check whether the task matches a free-text search query.
    ///
    /// Case-insensitive substring match over title and description.
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();

        if self.title.to_lowercase().contains(&query) {
            return true;
        }

        self.description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains(&query))
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
