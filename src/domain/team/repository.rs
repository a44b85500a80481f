//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId, TeamMember};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Result of a team provisioning call
///
/// `unresolved_emails` holds the candidate addresses that matched no
/// existing account, in input order. Partial resolution is a normal
/// outcome, not an error.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    pub team: Team,
    pub unresolved_emails: Vec<String>,
}

/// Repository for managing teams and memberships
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Provision a team in a single all-or-nothing transaction:
    ///
    /// 1. insert the team row
    /// 2. insert an ADMIN membership for `admin_id`
    /// 3. resolve `candidate_emails` against existing accounts
    ///    (case-sensitive exact match)
    /// 4. insert a MEMBER membership per match, skipping pairs that
    ///    already exist
    /// 5. report the emails that matched nothing
    ///
    /// On any failure the whole transaction rolls back; the team is never
    /// observable without its admin membership.
    async fn provision(
        &self,
        team: Team,
        admin_id: UserId,
        candidate_emails: &[String],
    ) -> Result<ProvisionOutcome, DomainError>;

    /// List teams the given user belongs to
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Team>, DomainError>;

    /// Delete a team and its memberships
    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError>;

    /// List all memberships of a team
    async fn members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, DomainError>;

    /// Get a single membership, if present
    async fn membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, DomainError>;

    /// Add a membership; fails with a conflict if the pair already exists
    async fn add_member(&self, member: TeamMember) -> Result<TeamMember, DomainError>;

    /// Remove a membership
    async fn remove_member(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError>;
}
