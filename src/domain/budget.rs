//! Budget queries over a built organization
//!
//! An employee's organization is the subtree rooted at the employee when they
//! manage people, or at their manager when they are an individual contributor.

use generational_arena::Index;
use tracing::{debug, instrument};

use super::arena::Organization;
use super::entities::{Budget, EmployeeId, OrgSummary};
use super::error::{DomainError, DomainResult};

impl Organization {
    /// Resolve the root of `employee_id`'s organization.
    ///
    /// Managers own their organization. Individual contributors roll up into
    /// their manager's; one without a manager is an organization of one.
    #[instrument(level = "debug", skip(self))]
    pub fn org_root(&self, employee_id: EmployeeId) -> Option<Index> {
        let idx = self.index_of(employee_id)?;
        let node = self.node(idx)?;
        if node.is_manager() {
            Some(idx)
        } else {
            Some(node.manager.unwrap_or(idx))
        }
    }

    /// Sum of budgets over `root` and all of its descendants.
    ///
    /// `None` when the total does not fit in a [`Budget`]. Intermediate sums
    /// are exact, so the result does not depend on traversal order.
    pub fn subtree_budget(&self, root: Index) -> Option<Budget> {
        let (_, total) = self.subtree_totals(root);
        Budget::try_from(total).ok()
    }

    /// Headcount and exact budget sum of the subtree under `root`.
    fn subtree_totals(&self, root: Index) -> (usize, i128) {
        self.iter_subtree(root).fold((0usize, 0i128), |(count, sum), (_, node)| {
            (count + 1, sum + i128::from(node.budget))
        })
    }

    /// Total budget of `employee_id`'s organization, 0 for unknown employees.
    ///
    /// An unknown id is indistinguishable from a zero-budget organization.
    /// A total outside the `i64` range saturates to `i64::MIN` or `i64::MAX`.
    /// Use [`Organization::try_org_budget`] to tell these cases apart.
    #[instrument(level = "debug", skip(self))]
    pub fn org_budget(&self, employee_id: EmployeeId) -> Budget {
        match self.org_root(employee_id) {
            Some(root) => {
                let (_, total) = self.subtree_totals(root);
                Budget::try_from(total).unwrap_or_else(|_| {
                    debug!(employee_id, "organization budget overflows, saturating");
                    if total < 0 {
                        Budget::MIN
                    } else {
                        Budget::MAX
                    }
                })
            }
            None => {
                debug!("{}, reporting 0", DomainError::UnknownEmployee(employee_id));
                0
            }
        }
    }

    pub fn try_org_budget(&self, employee_id: EmployeeId) -> DomainResult<Budget> {
        let root = self
            .org_root(employee_id)
            .ok_or(DomainError::UnknownEmployee(employee_id))?;
        self.subtree_budget(root).ok_or(DomainError::BudgetOverflow(employee_id))
    }

    /// Resolved root, headcount and budget of `employee_id`'s organization.
    #[instrument(level = "debug", skip(self))]
    pub fn org_summary(&self, employee_id: EmployeeId) -> DomainResult<OrgSummary> {
        let root = self
            .org_root(employee_id)
            .ok_or(DomainError::UnknownEmployee(employee_id))?;
        let root_id = self
            .node(root)
            .map(|node| node.id)
            .ok_or(DomainError::UnknownEmployee(employee_id))?;

        let (headcount, total) = self.subtree_totals(root);
        let budget = Budget::try_from(total).map_err(|_| DomainError::BudgetOverflow(employee_id))?;

        Ok(OrgSummary {
            employee_id,
            root_id,
            headcount,
            budget,
        })
    }
}

/// Total budget of `employee_id`'s organization within `org`, 0 if unknown.
///
/// Saturates like [`Organization::org_budget`].
pub fn get_org_budget(org: &Organization, employee_id: EmployeeId) -> Budget {
    org.org_budget(employee_id)
}
