//! Team service for provisioning, membership and access control

use std::sync::Arc;

use tracing::info;

use crate::domain::team::{
    validate_team_description, validate_team_name, ProvisionOutcome, Team, TeamId, TeamMember,
    TeamRepository, TeamRole,
};
use crate::domain::user::{UserId, UserRepository};
use crate::domain::DomainError;

/// Request for provisioning a new team
#[derive(Debug, Clone)]
pub struct ProvisionTeamRequest {
    pub name: String,
    pub description: Option<String>,
    /// Candidate member emails; entries are trimmed, and those without an
    /// '@' are dropped before resolution and never reported back
    pub member_emails: Vec<String>,
}

/// A team membership joined with the account it belongs to
#[derive(Debug, Clone)]
pub struct MemberDetails {
    pub user_id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: TeamRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

/// Team service
///
/// Every operation takes the requesting user explicitly; there is no
/// ambient identity.
#[derive(Debug)]
pub struct TeamService<T: TeamRepository, U: UserRepository> {
    teams: Arc<T>,
    users: Arc<U>,
}

impl<T: TeamRepository, U: UserRepository> TeamService<T, U> {
    /// Create a new team service
    pub fn new(teams: Arc<T>, users: Arc<U>) -> Self {
        Self { teams, users }
    }

    /// Provision a team for `requester`: create it, attach the requester
    /// as admin, resolve candidate emails and attach the matches as
    /// members. The whole operation is atomic.
    pub async fn provision(
        &self,
        requester: UserId,
        request: ProvisionTeamRequest,
    ) -> Result<ProvisionOutcome, DomainError> {
        validate_team_name(&request.name)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(ref description) = request.description {
            validate_team_description(description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        let mut team = Team::new(request.name)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if let Some(description) = request.description {
            team = team.with_description(description);
        }

        let candidates: Vec<String> = request
            .member_emails
            .iter()
            .map(|e| e.trim().to_string())
            .filter(|e| e.contains('@'))
            .collect();

        info!(
            team_id = %team.id(),
            candidates = candidates.len(),
            "Provisioning team"
        );

        let outcome = self.teams.provision(team, requester, &candidates).await?;

        if !outcome.unresolved_emails.is_empty() {
            info!(
                team_id = %outcome.team.id(),
                unresolved = outcome.unresolved_emails.len(),
                "Some candidate emails matched no account"
            );
        }

        Ok(outcome)
    }

    /// Get a team; the requester must be a member
    pub async fn get(&self, requester: UserId, id: &str) -> Result<Team, DomainError> {
        let team_id = parse_team_id(id)?;
        let team = self.require_team(&team_id).await?;
        self.require_membership(&team_id, &requester).await?;
        Ok(team)
    }

    /// List teams the requester belongs to
    pub async fn list(&self, requester: UserId) -> Result<Vec<Team>, DomainError> {
        self.teams.list_for_user(&requester).await
    }

    /// Delete a team; admins only
    pub async fn delete(&self, requester: UserId, id: &str) -> Result<(), DomainError> {
        let team_id = parse_team_id(id)?;
        self.require_team(&team_id).await?;
        self.require_admin(&team_id, &requester).await?;

        info!(team_id = %team_id, "Deleting team");

        self.teams.delete(&team_id).await?;
        Ok(())
    }

    /// List team members with their account details; members only
    pub async fn members(
        &self,
        requester: UserId,
        id: &str,
    ) -> Result<Vec<MemberDetails>, DomainError> {
        let team_id = parse_team_id(id)?;
        self.require_team(&team_id).await?;
        self.require_membership(&team_id, &requester).await?;

        let memberships = self.teams.members(&team_id).await?;
        let mut details = Vec::with_capacity(memberships.len());

        for membership in memberships {
            let user = self
                .users
                .get(&membership.user_id())
                .await?
                .ok_or_else(|| {
                    DomainError::internal(format!(
                        "Membership references missing user '{}'",
                        membership.user_id()
                    ))
                })?;

            details.push(MemberDetails {
                user_id: user.id(),
                email: user.email().to_string(),
                name: user.name().map(str::to_string),
                role: membership.role(),
                joined_at: membership.joined_at(),
            });
        }

        Ok(details)
    }

    /// Add a user to a team by email; any member may invite
    pub async fn add_member(
        &self,
        requester: UserId,
        id: &str,
        email: &str,
    ) -> Result<MemberDetails, DomainError> {
        let team_id = parse_team_id(id)?;
        self.require_team(&team_id).await?;
        self.require_membership(&team_id, &requester).await?;

        let user = self.users.get_by_email(email).await?.ok_or_else(|| {
            DomainError::not_found("No account exists for the provided email")
        })?;

        let member = self
            .teams
            .add_member(TeamMember::new(user.id(), team_id, TeamRole::Member))
            .await?;

        info!(team_id = %team_id, user_id = %user.id(), "Member added");

        Ok(MemberDetails {
            user_id: user.id(),
            email: user.email().to_string(),
            name: user.name().map(str::to_string),
            role: member.role(),
            joined_at: member.joined_at(),
        })
    }

    /// Remove a member; admins only, and never themselves
    pub async fn remove_member(
        &self,
        requester: UserId,
        id: &str,
        user_id: &str,
    ) -> Result<(), DomainError> {
        let team_id = parse_team_id(id)?;
        let target = UserId::parse(user_id)
            .map_err(|e| DomainError::invalid_id(format!("Invalid user ID: {}", e)))?;

        self.require_team(&team_id).await?;
        self.require_admin(&team_id, &requester).await?;

        if target == requester {
            return Err(DomainError::forbidden(
                "Admins cannot remove themselves from a team",
            ));
        }

        if !self.teams.remove_member(&team_id, &target).await? {
            return Err(DomainError::not_found(format!(
                "User '{}' is not a member of the team",
                target
            )));
        }

        info!(team_id = %team_id, user_id = %target, "Member removed");
        Ok(())
    }

    async fn require_team(&self, team_id: &TeamId) -> Result<Team, DomainError> {
        self.teams
            .get(team_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))
    }

    async fn require_membership(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<TeamMember, DomainError> {
        self.teams
            .membership(team_id, user_id)
            .await?
            .ok_or_else(|| DomainError::forbidden("You are not a member of this team"))
    }

    async fn require_admin(
        &self,
        team_id: &TeamId,
        user_id: &UserId,
    ) -> Result<TeamMember, DomainError> {
        let membership = self.require_membership(team_id, user_id).await?;

        if !membership.is_admin() {
            return Err(DomainError::forbidden(
                "Only team admins may perform this action",
            ));
        }

        Ok(membership)
    }
}

fn parse_team_id(id: &str) -> Result<TeamId, DomainError> {
    TeamId::parse(id).map_err(|e| DomainError::invalid_id(format!("Invalid team ID: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::User;
    use crate::infrastructure::team::InMemoryTeamRepository;
    use crate::infrastructure::user::InMemoryUserRepository;

    type TestService = TeamService<InMemoryTeamRepository, InMemoryUserRepository>;

    fn create_service() -> (Arc<InMemoryUserRepository>, TestService) {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new(users.clone()));
        (users.clone(), TeamService::new(teams, users))
    }

    async fn add_user(users: &InMemoryUserRepository, email: &str) -> UserId {
        let user = User::new(email, "hash");
        let id = user.id();
        users.create(user).await.unwrap();
        id
    }

    fn request(name: &str, emails: &[&str]) -> ProvisionTeamRequest {
        ProvisionTeamRequest {
            name: name.to_string(),
            description: None,
            member_emails: emails.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_provision_attaches_requester_as_admin() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;

        let outcome = service
            .provision(requester, request("My Team", &[]))
            .await
            .unwrap();
        assert!(outcome.unresolved_emails.is_empty());

        let members = service
            .members(requester, &outcome.team.id().to_string())
            .await
            .unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user_id, requester);
        assert_eq!(members[0].role, TeamRole::Admin);
    }

    #[tokio::test]
    async fn test_provision_partial_resolution() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;
        add_user(&users, "a@x.com").await;

        // "a" resolves, "b" does not, "not-an-email" is dropped outright
        let outcome = service
            .provision(
                requester,
                request("My Team", &["a@x.com", "b@x.com", "not-an-email"]),
            )
            .await
            .unwrap();

        assert_eq!(outcome.unresolved_emails, vec!["b@x.com".to_string()]);

        let members = service
            .members(requester, &outcome.team.id().to_string())
            .await
            .unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_provision_trims_padded_emails() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;
        let a = add_user(&users, "a@x.com").await;

        let outcome = service
            .provision(requester, request("My Team", &["  a@x.com  "]))
            .await
            .unwrap();

        assert!(outcome.unresolved_emails.is_empty());

        let members = service
            .members(requester, &outcome.team.id().to_string())
            .await
            .unwrap();
        assert!(members.iter().any(|m| m.user_id == a));
    }

    #[tokio::test]
    async fn test_provision_unresolved_preserves_input_order() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;

        let outcome = service
            .provision(requester, request("My Team", &["z@x.com", "a@x.com"]))
            .await
            .unwrap();

        assert_eq!(
            outcome.unresolved_emails,
            vec!["z@x.com".to_string(), "a@x.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_provision_invalid_name() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;

        let result = service.provision(requester, request("", &[])).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_get_requires_membership() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;
        let outsider = add_user(&users, "bob@example.com").await;

        let outcome = service
            .provision(requester, request("My Team", &[]))
            .await
            .unwrap();
        let id = outcome.team.id().to_string();

        assert!(service.get(requester, &id).await.is_ok());

        let result = service.get(outsider, &id).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_get_unknown_team() {
        let (users, service) = create_service();
        let requester = add_user(&users, "alice@example.com").await;

        let result = service
            .get(requester, &TeamId::new().to_string())
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_scoped_to_requester() {
        let (users, service) = create_service();
        let alice = add_user(&users, "alice@example.com").await;
        let bob = add_user(&users, "bob@example.com").await;

        service
            .provision(alice, request("Alice Team", &[]))
            .await
            .unwrap();

        assert_eq!(service.list(alice).await.unwrap().len(), 1);
        assert!(service.list(bob).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_admin() {
        let (users, service) = create_service();
        let admin = add_user(&users, "alice@example.com").await;
        let member = add_user(&users, "bob@example.com").await;

        let outcome = service
            .provision(admin, request("My Team", &["bob@example.com"]))
            .await
            .unwrap();
        let id = outcome.team.id().to_string();

        let result = service.delete(member, &id).await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        service.delete(admin, &id).await.unwrap();
        assert!(service.list(admin).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_member_by_email() {
        let (users, service) = create_service();
        let admin = add_user(&users, "alice@example.com").await;
        let bob = add_user(&users, "bob@example.com").await;

        let outcome = service
            .provision(admin, request("My Team", &[]))
            .await
            .unwrap();
        let id = outcome.team.id().to_string();

        let details = service
            .add_member(admin, &id, "bob@example.com")
            .await
            .unwrap();
        assert_eq!(details.user_id, bob);
        assert_eq!(details.role, TeamRole::Member);

        // Added member can now invite too
        add_user(&users, "carol@example.com").await;
        service
            .add_member(bob, &id, "carol@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_member_unknown_email() {
        let (users, service) = create_service();
        let admin = add_user(&users, "alice@example.com").await;

        let outcome = service
            .provision(admin, request("My Team", &[]))
            .await
            .unwrap();

        let result = service
            .add_member(admin, &outcome.team.id().to_string(), "ghost@example.com")
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_member_requires_membership() {
        let (users, service) = create_service();
        let admin = add_user(&users, "alice@example.com").await;
        let outsider = add_user(&users, "bob@example.com").await;
        add_user(&users, "carol@example.com").await;

        let outcome = service
            .provision(admin, request("My Team", &[]))
            .await
            .unwrap();

        let result = service
            .add_member(outsider, &outcome.team.id().to_string(), "carol@example.com")
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_remove_member_requires_admin() {
        let (users, service) = create_service();
        let admin = add_user(&users, "alice@example.com").await;
        let bob = add_user(&users, "bob@example.com").await;
        let carol = add_user(&users, "carol@example.com").await;

        let outcome = service
            .provision(
                admin,
                request("My Team", &["bob@example.com", "carol@example.com"]),
            )
            .await
            .unwrap();
        let id = outcome.team.id().to_string();

        let result = service
            .remove_member(bob, &id, &carol.to_string())
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));

        service
            .remove_member(admin, &id, &carol.to_string())
            .await
            .unwrap();

        let members = service.members(admin, &id).await.unwrap();
        assert_eq!(members.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_member_no_self_removal() {
        let (users, service) = create_service();
        let admin = add_user(&users, "alice@example.com").await;

        let outcome = service
            .provision(admin, request("My Team", &[]))
            .await
            .unwrap();

        let result = service
            .remove_member(admin, &outcome.team.id().to_string(), &admin.to_string())
            .await;
        assert!(matches!(result, Err(DomainError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_members_include_account_details() {
        let (users, service) = create_service();

        let alice = User::new("alice@example.com", "hash").with_name("Alice");
        let requester = alice.id();
        users.create(alice).await.unwrap();

        let outcome = service
            .provision(requester, request("My Team", &[]))
            .await
            .unwrap();

        let members = service
            .members(requester, &outcome.team.id().to_string())
            .await
            .unwrap();
        assert_eq!(members[0].email, "alice@example.com");
        assert_eq!(members[0].name.as_deref(), Some("Alice"));
    }
}
