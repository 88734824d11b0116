//! Organization budget service
//!
//! Loads a roster, builds the organization and answers budget queries
//! according to the configured unknown-employee policy.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, Roster};
use crate::config::UnknownEmployeePolicy;
use crate::domain::{Budget, DomainError, EmployeeId, OrgBuilder, OrgSummary, Organization};
use crate::infrastructure::traits::FileSystem;

/// Service for loading organizations and querying their budgets.
pub struct BudgetService {
    fs: Arc<dyn FileSystem>,
    policy: UnknownEmployeePolicy,
}

impl BudgetService {
    /// Create a new budget service.
    pub fn new(fs: Arc<dyn FileSystem>, policy: UnknownEmployeePolicy) -> Self {
        Self { fs, policy }
    }

    pub fn policy(&self) -> UnknownEmployeePolicy {
        self.policy
    }

    /// Read and parse a roster file.
    #[instrument(level = "debug", skip(self))]
    pub fn load_roster(&self, path: &Path) -> ApplicationResult<Roster> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("roster not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "roster file does not exist",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read roster", path)?;
        Roster::parse(&content, path)
    }

    /// Load a roster file and build its organization.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Organization> {
        let roster = self.load_roster(path)?;
        let org = OrgBuilder::new().extend(roster.records()).build();
        info!("loaded {} employees from {}", org.len(), path.display());
        Ok(org)
    }

    /// Budget of `employee_id`'s organization, honoring the unknown-employee policy.
    ///
    /// The policy only covers unknown ids; an overflowing total is always an error.
    pub fn budget(
        &self,
        org: &Organization,
        employee_id: EmployeeId,
    ) -> ApplicationResult<Budget> {
        match org.try_org_budget(employee_id) {
            Err(DomainError::UnknownEmployee(_)) if self.policy == UnknownEmployeePolicy::Zero => {
                debug!("unknown employee {employee_id}, reporting 0");
                Ok(0)
            }
            result => Ok(result?),
        }
    }

    /// Budgets for several employees, in the order given.
    pub fn budgets(
        &self,
        org: &Organization,
        employee_ids: &[EmployeeId],
    ) -> ApplicationResult<Vec<(EmployeeId, Budget)>> {
        debug!("budgets: {} ids", employee_ids.len());
        employee_ids
            .iter()
            .map(|&id| self.budget(org, id).map(|budget| (id, budget)))
            .collect()
    }

    /// Summary of `employee_id`'s organization; unknown ids are always an error.
    pub fn summary(
        &self,
        org: &Organization,
        employee_id: EmployeeId,
    ) -> ApplicationResult<OrgSummary> {
        org.org_summary(employee_id).map_err(ApplicationError::from)
    }

    /// Fail with a domain error when `employee_id` is not in the organization.
    pub fn require(&self, org: &Organization, employee_id: EmployeeId) -> ApplicationResult<()> {
        if org.contains(employee_id) {
            Ok(())
        } else {
            Err(DomainError::UnknownEmployee(employee_id).into())
        }
    }
}
