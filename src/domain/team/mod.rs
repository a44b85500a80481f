//! Team domain
//!
//! Teams are the organizational unit of the application. A team is created
//! through provisioning, which atomically attaches the creator as admin and
//! resolves invited emails against existing accounts.

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId, TeamMember, TeamRole};
pub use repository::{ProvisionOutcome, TeamRepository};
pub use validation::{validate_team_description, validate_team_name, TeamValidationError};
