//! Task domain
//!
//! Tasks belong to a team, carry a workflow status, and may be assigned to a
//! member. Listing supports a status filter and a linear free-text search.

mod entity;
mod repository;
mod validation;

pub use entity::{Task, TaskId, TaskStatus};
pub use repository::{TaskQuery, TaskRepository};
pub use validation::{validate_task_description, validate_task_title, TaskValidationError};
