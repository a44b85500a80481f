//! Task validation

use thiserror::Error;

/// Errors that can occur during task validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TaskValidationError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error("Task title cannot exceed {0} characters")]
    TitleTooLong(usize),

    #[error("Task description cannot exceed {0} characters")]
    DescriptionTooLong(usize),
}

const MAX_TASK_TITLE_LENGTH: usize = 200;
const MAX_TASK_DESCRIPTION_LENGTH: usize = 2000;

/// Validate a task title
pub fn validate_task_title(title: &str) -> Result<(), TaskValidationError> {
    if title.is_empty() {
        return Err(TaskValidationError::EmptyTitle);
    }

    if title.len() > MAX_TASK_TITLE_LENGTH {
        return Err(TaskValidationError::TitleTooLong(MAX_TASK_TITLE_LENGTH));
    }

    Ok(())
}

/// Validate a task description
pub fn validate_task_description(description: &str) -> Result<(), TaskValidationError> {
    if description.len() > MAX_TASK_DESCRIPTION_LENGTH {
        return Err(TaskValidationError::DescriptionTooLong(
            MAX_TASK_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}
