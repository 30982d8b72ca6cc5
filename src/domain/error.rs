//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// The structural check an employee list failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("employee {employee_id} has an empty name")]
    EmptyName { employee_id: i64 },

    #[error("employee id must be a positive integer: {employee_id}")]
    NonPositiveId { employee_id: i64 },

    #[error("duplicate employee id: {employee_id}")]
    DuplicateId { employee_id: i64 },

    #[error("no employee without a manager (CEO) found")]
    NoRoot,

    #[error("more than one employee without a manager: {employee_ids:?}")]
    MultipleRoots { employee_ids: Vec<i64> },

    #[error("employee {employee_id} is listed as their own manager")]
    SelfManaged { employee_id: i64 },

    #[error("employee {employee_id} refers to unknown manager {manager_id}")]
    DanglingManager { employee_id: i64, manager_id: i64 },
}

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid employee list: {0}")]
    InvalidInput(#[from] ValidationError),

    #[error("no root employee found")]
    NoRootFound,

    #[error("multiple root employees found: {0:?}")]
    MultipleRoots(Vec<i64>),

    #[error("{reached} of {total} employees are reachable from the CEO, unreachable: {unreachable:?}")]
    IncompleteHierarchy {
        reached: usize,
        total: usize,
        unreachable: Vec<i64>,
    },

    #[error("CEO {employee_id} does not have any subordinates")]
    EmptyHierarchy { employee_id: i64 },
}

impl DomainError {
    /// True when the input itself is malformed, false when it is well-formed
    /// but does not make up a single connected hierarchy.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, DomainError::InvalidInput(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
