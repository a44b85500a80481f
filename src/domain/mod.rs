//! Domain layer - Core business logic and entities

pub mod error;
pub mod task;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use task::{Task, TaskId, TaskQuery, TaskRepository, TaskStatus};
pub use team::{ProvisionOutcome, Team, TeamId, TeamMember, TeamRepository, TeamRole};
pub use user::{User, UserId, UserRepository};
