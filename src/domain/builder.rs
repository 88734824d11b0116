//! Organization builder: flat employee records to an indexed tree

use tracing::{debug, instrument};

use super::arena::Organization;
use super::entities::EmployeeRecord;

/// Collects employee records and links them into an [`Organization`].
///
/// Building never fails. Manager ids that do not resolve (or that point at
/// the employee itself) leave the node without a manager, making it a root.
#[derive(Debug, Default, Clone)]
pub struct OrgBuilder {
    records: Vec<EmployeeRecord>,
}

impl OrgBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: EmployeeRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    pub fn extend<I>(&mut self, records: I) -> &mut Self
    where
        I: IntoIterator<Item = EmployeeRecord>,
    {
        self.records.extend(records);
        self
    }

    #[instrument(level = "debug", skip(self), fields(records = self.records.len()))]
    pub fn build(&self) -> Organization {
        let mut org = Organization::default();

        // Every node must be resolvable before linking: reports may precede
        // their manager in the input.
        for record in &self.records {
            org.allocate(record);
        }

        let mut dangling = 0usize;
        for idx in org.node_indices() {
            let Some((id, Some(manager_id))) = org.node(idx).map(|n| (n.id, n.manager_id)) else {
                continue;
            };
            match org.index_of(manager_id) {
                Some(manager_idx) if manager_idx != idx => org.link(idx, manager_idx),
                _ => {
                    debug!(employee_id = id, manager_id, "unresolved manager, treating as root");
                    dangling += 1;
                }
            }
        }

        debug!(
            employees = org.len(),
            roots = org.roots().len(),
            dangling,
            "organization built"
        );
        org
    }
}

/// Build an organization from a flat list of records.
pub fn build(records: &[EmployeeRecord]) -> Organization {
    OrgBuilder::new().extend(records.iter().copied()).build()
}
