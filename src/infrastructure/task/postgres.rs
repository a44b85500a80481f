//! PostgreSQL task repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::task::{Task, TaskId, TaskQuery, TaskRepository, TaskStatus};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of TaskRepository
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_TASK: &str = r#"
    SELECT id, team_id, title, description, status, due_date,
           created_by, assigned_to, created_at, updated_at
    FROM tasks
"#;

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn get(&self, id: &TaskId) -> Result<Option<Task>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_TASK))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get task: {}", e)))?;

        Ok(row.map(|r| row_to_task(&r)))
    }

    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, team_id, title, description, status, due_date,
                               created_by, assigned_to, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.team_id().as_uuid())
        .bind(task.title())
        .bind(task.description())
        .bind(task.status().to_string())
        .bind(task.due_date())
        .bind(task.created_by().as_uuid())
        .bind(task.assigned_to().map(|u| u.as_uuid()))
        .bind(task.created_at())
        .bind(task.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to create task: {}", e)))?;

        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Task, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = $2, description = $3, status = $4, due_date = $5,
                assigned_to = $6, updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(task.id().as_uuid())
        .bind(task.title())
        .bind(task.description())
        .bind(task.status().to_string())
        .bind(task.due_date())
        .bind(task.assigned_to().map(|u| u.as_uuid()))
        .bind(task.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update task: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Task '{}' not found",
                task.id()
            )));
        }

        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete task: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_for_team(
        &self,
        team_id: &TeamId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            {} WHERE team_id = $1
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR $3 = ''
                   OR title ILIKE '%' || $3 || '%'
                   OR description ILIKE '%' || $3 || '%')
            ORDER BY created_at DESC
            "#,
            SELECT_TASK
        ))
        .bind(team_id.as_uuid())
        .bind(query.status.map(|s| s.to_string()))
        .bind(query.search.as_deref().map(escape_like))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list team tasks: {}", e)))?;

        Ok(rows.iter().map(row_to_task).collect())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
        query: &TaskQuery,
    ) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query(&format!(
            r#"
            {} WHERE (assigned_to = $1 OR created_by = $1)
              AND ($2::text IS NULL OR status = $2)
              AND ($3::text IS NULL OR $3 = ''
                   OR title ILIKE '%' || $3 || '%'
                   OR description ILIKE '%' || $3 || '%')
            ORDER BY due_date ASC NULLS LAST, created_at ASC
            "#,
            SELECT_TASK
        ))
        .bind(user_id.as_uuid())
        .bind(query.status.map(|s| s.to_string()))
        .bind(query.search.as_deref().map(escape_like))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list user tasks: {}", e)))?;

        Ok(rows.iter().map(row_to_task).collect())
    }
}

/// The search is a literal substring; ILIKE gives `%`, `_` and `\` special
/// meaning, so they are escaped before being spliced into the pattern
fn escape_like(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());

    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }

    escaped
}

fn row_to_task(row: &sqlx::postgres::PgRow) -> Task {
    let id: Uuid = row.get("id");
    let team_id: Uuid = row.get("team_id");
    let title: String = row.get("title");
    let description: Option<String> = row.get("description");
    let status: String = row.get("status");
    let due_date: Option<chrono::DateTime<chrono::Utc>> = row.get("due_date");
    let created_by: Uuid = row.get("created_by");
    let assigned_to: Option<Uuid> = row.get("assigned_to");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Task::from_storage(
        TaskId::from(id),
        TeamId::from(team_id),
        title,
        description,
        TaskStatus::parse(&status).unwrap_or_default(),
        due_date,
        UserId::from(created_by),
        assigned_to.map(UserId::from),
        created_at,
        updated_at,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_metacharacters() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain search"), "plain search");
        assert_eq!(escape_like(""), "");
    }
}
