//! Team infrastructure
//!
//! In-memory and PostgreSQL repositories plus the team service. Both
//! repositories implement provisioning as an all-or-nothing operation.

mod in_memory;
mod postgres;
mod service;

pub use in_memory::InMemoryTeamRepository;
pub use postgres::PostgresTeamRepository;
pub use service::{MemberDetails, ProvisionTeamRequest, TeamService};
