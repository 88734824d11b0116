//! Domain entities: core data structures

use std::fmt;

/// Employee identifier as supplied by the roster.
pub type EmployeeId = i64;

/// Budget amount of a single employee or an aggregated organization.
pub type Budget = i64;

/// Flat input record describing one employee.
///
/// `manager_id` is `None` for the CEO (root of the hierarchy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub employee_id: EmployeeId,
    pub manager_id: Option<EmployeeId>,
    pub budget: Budget,
}

impl EmployeeRecord {
    pub fn new(employee_id: EmployeeId, manager_id: Option<EmployeeId>, budget: Budget) -> Self {
        Self {
            employee_id,
            manager_id,
            budget,
        }
    }
}

/// Result of resolving and aggregating an employee's organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgSummary {
    /// Employee the query was made for
    pub employee_id: EmployeeId,
    /// Root of the organization the employee belongs to
    pub root_id: EmployeeId,
    /// Number of people in the organization, root included
    pub headcount: usize,
    /// Sum of all budgets in the organization
    pub budget: Budget,
}

impl fmt::Display for OrgSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "employee {} -> org of {}: {} people, budget {}",
            self.employee_id, self.root_id, self.headcount, self.budget
        )
    }
}
