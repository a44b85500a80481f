//! In-memory team repository implementation
//!
//! Provisioning is made all-or-nothing by staging every row first and only
//! then writing to the maps inside a single critical section.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::team::{ProvisionOutcome, Team, TeamId, TeamMember, TeamRepository, TeamRole};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// In-memory implementation of TeamRepository
///
/// Holds a user repository handle so candidate emails can be resolved the
/// same way the SQL implementation resolves them inside its transaction.
#[derive(Debug)]
pub struct InMemoryTeamRepository {
    users: Arc<dyn UserRepository>,
    teams: Arc<RwLock<HashMap<TeamId, Team>>>,
    members: Arc<RwLock<HashMap<(TeamId, UserId), TeamMember>>>,
    fail_member_inserts: AtomicBool,
}

impl InMemoryTeamRepository {
    /// Create a new empty repository resolving emails against `users`
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            teams: Arc::new(RwLock::new(HashMap::new())),
            members: Arc::new(RwLock::new(HashMap::new())),
            fail_member_inserts: AtomicBool::new(false),
        }
    }

    /// Make the next provisioning call fail during member attachment,
    /// simulating a storage error mid-transaction
    #[cfg(test)]
    pub fn fail_member_inserts(&self, fail: bool) {
        self.fail_member_inserts.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let teams = self.teams.read().await;
        Ok(teams.get(id).cloned())
    }

    async fn provision(
        &self,
        team: Team,
        admin_id: UserId,
        candidate_emails: &[String],
    ) -> Result<ProvisionOutcome, DomainError> {
        let team_id = team.id();

        // Resolve candidate emails against existing accounts
        // (case-sensitive exact match)
        let mut matched: Vec<UserId> = Vec::new();
        let mut matched_emails: Vec<String> = Vec::new();

        for email in candidate_emails {
            if let Some(user) = self.users.get_by_email(email).await? {
                matched.push(user.id());
                matched_emails.push(user.email().to_string());
            }
        }

        let unresolved_emails: Vec<String> = candidate_emails
            .iter()
            .filter(|e| !matched_emails.contains(e))
            .cloned()
            .collect();

        // Stage all rows before touching the maps
        let admin_row = TeamMember::new(admin_id, team_id, TeamRole::Admin);

        let mut member_rows: Vec<TeamMember> = Vec::new();

        for user_id in matched {
            // Skip duplicates: the admin row already covers the requester,
            // and a matched email may appear twice in the input
            if user_id == admin_id || member_rows.iter().any(|m| m.user_id() == user_id) {
                continue;
            }

            member_rows.push(TeamMember::new(user_id, team_id, TeamRole::Member));
        }

        if self.fail_member_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::storage("Member insert failed"));
        }

        // Commit atomically under both write locks
        let mut teams = self.teams.write().await;
        let mut members = self.members.write().await;

        if teams.contains_key(&team_id) {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team_id
            )));
        }

        teams.insert(team_id, team.clone());
        members.insert((team_id, admin_id), admin_row);

        for row in member_rows {
            members.insert((team_id, row.user_id()), row);
        }

        Ok(ProvisionOutcome {
            team,
            unresolved_emails,
        })
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Team>, DomainError> {
        let teams = self.teams.read().await;
        let members = self.members.read().await;

        let mut result: Vec<Team> = members
            .keys()
            .filter(|(_, uid)| uid == user_id)
            .filter_map(|(tid, _)| teams.get(tid).cloned())
            .collect();

        result.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(result)
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError> {
        let mut teams = self.teams.write().await;
        let mut members = self.members.write().await;

        members.retain(|(tid, _), _| tid != id);
        Ok(teams.remove(id).is_some())
    }

    async fn members(&self, team_id: &TeamId) -> Result<Vec<TeamMember>, DomainError> {
        let members = self.members.read().await;

        let mut result: Vec<TeamMember> = members
            .values()
            .filter(|m| m.team_id() == *team_id)
            .cloned()
            .collect();

        result.sort_by_key(|m| m.joined_at());
        Ok(result)
    }

    async fn membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<Option<TeamMember>, DomainError> {
        let members = self.members.read().await;
        Ok(members.get(&(*team_id, *user_id)).cloned())
    }

    async fn add_member(&self, member: TeamMember) -> Result<TeamMember, DomainError> {
        let teams = self.teams.read().await;

        if !teams.contains_key(&member.team_id()) {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                member.team_id()
            )));
        }

        let mut members = self.members.write().await;
        let key = (member.team_id(), member.user_id());

        if members.contains_key(&key) {
            return Err(DomainError::conflict(
                "User is already a member of the team",
            ));
        }

        members.insert(key, member.clone());
        Ok(member)
    }

    async fn remove_member(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        let mut members = self.members.write().await;
        Ok(members.remove(&(*team_id, *user_id)).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::user::InMemoryUserRepository;

    async fn setup() -> (Arc<InMemoryUserRepository>, InMemoryTeamRepository) {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = InMemoryTeamRepository::new(users.clone());
        (users, teams)
    }

    async fn add_user(users: &InMemoryUserRepository, email: &str) -> UserId {
        let user = User::new(email, "hash");
        let id = user.id();
        users.create(user).await.unwrap();
        id
    }

    #[tokio::test]
    async fn test_provision_creates_team_and_admin() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;

        let team = Team::new("My Team").unwrap();
        let team_id = team.id();

        let outcome = repo.provision(team, admin, &[]).await.unwrap();

        assert_eq!(outcome.team.id(), team_id);
        assert!(outcome.unresolved_emails.is_empty());

        let members = repo.members(&team_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id(), admin);
        assert!(members[0].is_admin());
    }

    #[tokio::test]
    async fn test_provision_resolves_existing_emails() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;
        let a = add_user(&users, "a@x.com").await;
        let b = add_user(&users, "b@x.com").await;

        let team = Team::new("My Team").unwrap();
        let team_id = team.id();

        let candidates = vec![
            "a@x.com".to_string(),
            "b@x.com".to_string(),
            "c@x.com".to_string(),
        ];
        let outcome = repo.provision(team, admin, &candidates).await.unwrap();

        assert_eq!(outcome.unresolved_emails, vec!["c@x.com".to_string()]);

        let members = repo.members(&team_id).await.unwrap();
        assert_eq!(members.len(), 3);

        let member_a = repo.membership(&team_id, &a).await.unwrap().unwrap();
        assert_eq!(member_a.role(), TeamRole::Member);
        let member_b = repo.membership(&team_id, &b).await.unwrap().unwrap();
        assert_eq!(member_b.role(), TeamRole::Member);
    }

    #[tokio::test]
    async fn test_provision_requester_own_email_skipped() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;

        let team = Team::new("My Team").unwrap();
        let team_id = team.id();

        let candidates = vec!["admin@example.com".to_string()];
        let outcome = repo.provision(team, admin, &candidates).await.unwrap();

        // Resolved, so not reported; and no duplicate row - the requester
        // keeps the admin membership
        assert!(outcome.unresolved_emails.is_empty());

        let members = repo.members(&team_id).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].is_admin());
    }

    #[tokio::test]
    async fn test_provision_email_match_is_case_sensitive() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;
        add_user(&users, "a@x.com").await;

        let team = Team::new("My Team").unwrap();

        let candidates = vec!["A@X.COM".to_string()];
        let outcome = repo.provision(team, admin, &candidates).await.unwrap();

        assert_eq!(outcome.unresolved_emails, vec!["A@X.COM".to_string()]);
    }

    #[tokio::test]
    async fn test_provision_failure_leaves_no_rows() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;
        add_user(&users, "a@x.com").await;

        let team = Team::new("Doomed Team").unwrap();
        let team_id = team.id();

        repo.fail_member_inserts(true);
        let result = repo
            .provision(team, admin, &["a@x.com".to_string()])
            .await;
        assert!(result.is_err());

        // The team id from the failed attempt must not exist afterwards
        assert!(repo.get(&team_id).await.unwrap().is_none());
        assert!(repo.members(&team_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_for_user() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;
        let other = add_user(&users, "other@example.com").await;

        repo.provision(Team::new("Team B").unwrap(), admin, &[])
            .await
            .unwrap();
        repo.provision(Team::new("Team A").unwrap(), admin, &[])
            .await
            .unwrap();

        let teams = repo.list_for_user(&admin).await.unwrap();
        assert_eq!(teams.len(), 2);
        // Sorted by name
        assert_eq!(teams[0].name(), "Team A");
        assert_eq!(teams[1].name(), "Team B");

        assert!(repo.list_for_user(&other).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_member_conflict() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;
        let other = add_user(&users, "other@example.com").await;

        let team = Team::new("My Team").unwrap();
        let team_id = team.id();
        repo.provision(team, admin, &[]).await.unwrap();

        repo.add_member(TeamMember::new(other, team_id, TeamRole::Member))
            .await
            .unwrap();

        let result = repo
            .add_member(TeamMember::new(other, team_id, TeamRole::Member))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_add_member_unknown_team() {
        let (users, repo) = setup().await;
        let user = add_user(&users, "a@x.com").await;

        let result = repo
            .add_member(TeamMember::new(user, TeamId::new(), TeamRole::Member))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_member() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;
        let other = add_user(&users, "other@example.com").await;

        let team = Team::new("My Team").unwrap();
        let team_id = team.id();
        repo.provision(team, admin, &["other@example.com".to_string()])
            .await
            .unwrap();

        assert!(repo.remove_member(&team_id, &other).await.unwrap());
        assert!(!repo.remove_member(&team_id, &other).await.unwrap());
        assert!(repo.membership(&team_id, &other).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_memberships() {
        let (users, repo) = setup().await;
        let admin = add_user(&users, "admin@example.com").await;

        let team = Team::new("My Team").unwrap();
        let team_id = team.id();
        repo.provision(team, admin, &[]).await.unwrap();

        assert!(repo.delete(&team_id).await.unwrap());
        assert!(repo.get(&team_id).await.unwrap().is_none());
        assert!(repo.members(&team_id).await.unwrap().is_empty());
        assert!(repo.list_for_user(&admin).await.unwrap().is_empty());
    }
}
