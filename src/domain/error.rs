//! Domain-level errors (no external dependencies)

use thiserror::Error;

use super::entities::EmployeeId;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown employee: {0}")]
    UnknownEmployee(EmployeeId),

    #[error("budget of the organization of {0} does not fit in 64 bits")]
    BudgetOverflow(EmployeeId),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
