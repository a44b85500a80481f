//! PostgreSQL team repository implementation

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::team::{
    ProvisionOutcome, Team, TeamId, TeamMember, TeamRepository, TeamRole,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;

use crate::infrastructure::user::postgres::is_unique_violation;

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_TEAM: &str = r#"
    SELECT id, name, description, created_at, updated_at
    FROM teams
"#;

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE id = $1", SELECT_TEAM))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        Ok(row.map(|r| row_to_team(&r)))
    }

    async fn provision(
        &self,
        team: Team,
        admin_id: UserId,
        candidate_emails: &[String],
    ) -> Result<ProvisionOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.name())
        .bind(team.description())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert team: {}", e)))?;

        let admin_row = TeamMember::new(admin_id, team.id(), TeamRole::Admin);

        sqlx::query(
            r#"
            INSERT INTO team_members (user_id, team_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(admin_row.user_id().as_uuid())
        .bind(admin_row.team_id().as_uuid())
        .bind(role_to_str(admin_row.role()))
        .bind(admin_row.joined_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert admin membership: {}", e)))?;

        // Resolve candidate emails inside the transaction
        let rows = sqlx::query("SELECT id, email FROM users WHERE email = ANY($1)")
            .bind(candidate_emails)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to resolve emails: {}", e)))?;

        let mut matched_emails: Vec<String> = Vec::with_capacity(rows.len());

        for row in &rows {
            let user_id: Uuid = row.get("id");
            let email: String = row.get("email");

            // ON CONFLICT covers the requester listing their own email and
            // repeated candidate emails
            sqlx::query(
                r#"
                INSERT INTO team_members (user_id, team_id, role, joined_at)
                VALUES ($1, $2, $3, NOW())
                ON CONFLICT (user_id, team_id) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(team.id().as_uuid())
            .bind(role_to_str(TeamRole::Member))
            .execute(&mut *tx)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to insert membership: {}", e)))?;

            matched_emails.push(email);
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit transaction: {}", e)))?;

        let unresolved_emails = candidate_emails
            .iter()
            .filter(|e| !matched_emails.contains(e))
            .cloned()
            .collect();

        Ok(ProvisionOutcome {
            team,
            unresolved_emails,
        })
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.description, t.created_at, t.updated_at
            FROM teams t
            JOIN team_members m ON m.team_id = t.id
            WHERE m.user_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        Ok(rows.iter().map(row_to_team).collect())
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError> {
        // team_members and tasks cascade via their foreign keys
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete team: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, team_id, role, joined_at
            FROM team_members
            WHERE team_id = $1
            ORDER BY joined_at
            "#,
        )
        .bind(team_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list members: {}", e)))?;

        Ok(rows.iter().map(row_to_member).collect())
    }

    async fn membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, team_id, role, joined_at
            FROM team_members
            WHERE team_id = $1 AND user_id = $2
            "#,
        )
        .bind(team_id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get membership: {}", e)))?;

        Ok(row.map(|r| row_to_member(&r)))
    }

    async fn add_member(&self, member: TeamMember) -> Result<TeamMember, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO team_members (user_id, team_id, role, joined_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(member.user_id().as_uuid())
        .bind(member.team_id().as_uuid())
        .bind(role_to_str(member.role()))
        .bind(member.joined_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::conflict("User is already a member of the team")
            } else {
                DomainError::storage(format!("Failed to add member: {}", e))
            }
        })?;

        Ok(member)
    }

    async fn remove_member(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let result =
            sqlx::query("DELETE FROM team_members WHERE team_id = $1 AND user_id = $2")
                .bind(team_id.as_uuid())
                .bind(user_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to remove member: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Team {
    let id: Uuid = row.get("id");
    let name: String = row.get("name");
    let description: Option<String> = row.get("description");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    Team::from_storage(TeamId::from(id), name, description, created_at, updated_at)
}

fn row_to_member(row: &sqlx::postgres::PgRow) -> TeamMember {
    let user_id: Uuid = row.get("user_id");
    let team_id: Uuid = row.get("team_id");
    let role: String = row.get("role");
    let joined_at: chrono::DateTime<chrono::Utc> = row.get("joined_at");

    TeamMember::from_storage(
        UserId::from(user_id),
        TeamId::from(team_id),
        str_to_role(&role),
        joined_at,
    )
}

fn role_to_str(role: TeamRole) -> &'static str {
    match role {
        TeamRole::Admin => "ADMIN",
        TeamRole::Member => "MEMBER",
    }
}

fn str_to_role(s: &str) -> TeamRole {
    match s {
        "ADMIN" => TeamRole::Admin,
        _ => TeamRole::Member,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_conversion() {
        assert_eq!(role_to_str(TeamRole::Admin), "ADMIN");
        assert_eq!(role_to_str(TeamRole::Member), "MEMBER");

        assert_eq!(str_to_role("ADMIN"), TeamRole::Admin);
        assert_eq!(str_to_role("MEMBER"), TeamRole::Member);
        assert_eq!(str_to_role("unknown"), TeamRole::Member);
    }
}
