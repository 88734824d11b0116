use std::collections::{HashMap, HashSet};
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use super::entities::{Budget, EmployeeId, EmployeeRecord};

/// Employee node in the arena-based organization tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgNode {
    pub id: EmployeeId,
    pub budget: Budget,
    /// Manager id exactly as given in the record, resolvable or not
    pub manager_id: Option<EmployeeId>,
    /// Arena index of the manager, None for roots and dangling references
    pub manager: Option<Index>,
    /// Arena indices of direct reports, in input order
    pub reports: Vec<Index>,
}

impl OrgNode {
    fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            id: record.employee_id,
            budget: record.budget,
            manager_id: record.manager_id,
            manager: None,
            reports: Vec::new(),
        }
    }

    /// A manager is any node with at least one direct report.
    pub fn is_manager(&self) -> bool {
        !self.reports.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.manager.is_none()
    }
}

impl fmt::Display for OrgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.budget)
    }
}

/// Arena-based organization hierarchy.
///
/// Owns every node. Manager→report edges are stored as arena indices in
/// `reports`, the report→manager edge is the non-owning `manager` index.
/// The id index gives O(1) lookup of any employee.
#[derive(Debug, Default)]
pub struct Organization {
    arena: Arena<OrgNode>,
    index: HashMap<EmployeeId, Index>,
    /// Allocation order; indices of replaced duplicates go stale and are skipped
    order: Vec<Index>,
}

impl Organization {
    /// Allocate a node for `record` and register it in the id index.
    ///
    /// A later record with an already known id replaces the earlier node.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn allocate(&mut self, record: &EmployeeRecord) -> Index {
        let idx = self.arena.insert(OrgNode::from_record(record));
        if let Some(previous) = self.index.insert(record.employee_id, idx) {
            debug!(
                employee_id = record.employee_id,
                "duplicate employee id, later record wins"
            );
            self.arena.remove(previous);
        }
        self.order.push(idx);
        idx
    }

    /// Attach `report` below `manager`.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn link(&mut self, report: Index, manager: Index) {
        if let Some(node) = self.arena.get_mut(manager) {
            node.reports.push(report);
        }
        if let Some(node) = self.arena.get_mut(report) {
            node.manager = Some(manager);
        }
    }

    /// Live node indices in input order.
    pub(crate) fn node_indices(&self) -> Vec<Index> {
        self.order
            .iter()
            .copied()
            .filter(|&idx| self.arena.contains(idx))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, id: EmployeeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn index_of(&self, id: EmployeeId) -> Option<Index> {
        self.index.get(&id).copied()
    }

    pub fn node(&self, idx: Index) -> Option<&OrgNode> {
        self.arena.get(idx)
    }

    pub fn get(&self, id: EmployeeId) -> Option<&OrgNode> {
        self.index_of(id).and_then(|idx| self.node(idx))
    }

    /// All nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &OrgNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |&idx| self.arena.get(idx).map(|node| (idx, node)))
    }

    /// Ids of all nodes without a manager link, in input order.
    ///
    /// Besides the CEO this includes nodes whose manager id did not resolve.
    pub fn roots(&self) -> Vec<EmployeeId> {
        self.iter()
            .filter(|(_, node)| node.is_root())
            .map(|(_, node)| node.id)
            .collect()
    }

    pub fn manager_of(&self, id: EmployeeId) -> Option<EmployeeId> {
        self.get(id)
            .and_then(|node| node.manager)
            .and_then(|idx| self.node(idx))
            .map(|manager| manager.id)
    }

    pub fn reports_of(&self, id: EmployeeId) -> Vec<EmployeeId> {
        self.get(id)
            .map(|node| {
                node.reports
                    .iter()
                    .filter_map(|&idx| self.node(idx))
                    .map(|report| report.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_manager(&self, id: EmployeeId) -> bool {
        self.get(id).is_some_and(OrgNode::is_manager)
    }

    /// Ids of all individual contributors (leaf nodes), in input order.
    pub fn individual_contributors(&self) -> Vec<EmployeeId> {
        self.iter()
            .filter(|(_, node)| !node.is_manager())
            .map(|(_, node)| node.id)
            .collect()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_subtree(&self, root: Index) -> SubtreeIterator<'_> {
        SubtreeIterator::new(self, root)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, root: Index) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, root)
    }

    /// Number of levels in the deepest tree, 0 for an empty organization.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut visited = HashSet::new();
        let mut stack: Vec<(Index, usize)> = self
            .iter()
            .filter(|(_, node)| node.is_root())
            .map(|(idx, _)| (idx, 1))
            .collect();

        while let Some((idx, depth)) = stack.pop() {
            if !visited.insert(idx) {
                continue;
            }
            max_depth = max_depth.max(depth);
            if let Some(node) = self.node(idx) {
                for &report in &node.reports {
                    stack.push((report, depth + 1));
                }
            }
        }

        max_depth
    }
}

/// Pre-order traversal of one subtree.
///
/// Uses an explicit stack and never yields a node twice, so deep hierarchies
/// and malformed cyclic input both terminate.
pub struct SubtreeIterator<'a> {
    org: &'a Organization,
    stack: Vec<Index>,
    visited: HashSet<Index>,
}

impl<'a> SubtreeIterator<'a> {
    fn new(org: &'a Organization, root: Index) -> Self {
        let mut stack = Vec::new();
        if org.arena.contains(root) {
            stack.push(root);
        }
        Self {
            org,
            stack,
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for SubtreeIterator<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if !self.visited.insert(current_idx) {
                continue;
            }
            if let Some(node) = self.org.node(current_idx) {
                // Push reports in reverse order for left-to-right traversal
                for &report in node.reports.iter().rev() {
                    self.stack.push(report);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal of one subtree: reports before their manager.
pub struct PostOrderIterator<'a> {
    org: &'a Organization,
    stack: Vec<(Index, bool)>,
    visited: HashSet<Index>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(org: &'a Organization, root: Index) -> Self {
        let mut stack = Vec::new();
        if org.arena.contains(root) {
            stack.push((root, false));
        }
        Self {
            org,
            stack,
            visited: HashSet::new(),
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a OrgNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, expanded)) = self.stack.pop() {
            let Some(node) = self.org.node(current_idx) else {
                continue;
            };
            if expanded {
                return Some((current_idx, node));
            }
            if !self.visited.insert(current_idx) {
                continue;
            }
            self.stack.push((current_idx, true));
            for &report in node.reports.iter().rev() {
                self.stack.push((report, false));
            }
        }
        None
    }
}
