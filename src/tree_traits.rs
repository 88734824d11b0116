use std::collections::HashSet;

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{EmployeeId, Organization};

/// Render an organization as a `termtree` with `id (budget)` labels.
pub trait OrgTreeConvert {
    /// One tree per root, in input order.
    fn to_trees(&self) -> Vec<Tree<String>>;

    /// Tree of the organization `employee_id` belongs to.
    fn org_tree(&self, employee_id: EmployeeId) -> Option<Tree<String>>;
}

impl OrgTreeConvert for Organization {
    #[instrument(level = "debug", skip(self))]
    fn to_trees(&self) -> Vec<Tree<String>> {
        self.iter()
            .filter(|(_, node)| node.is_root())
            .map(|(idx, _)| subtree(self, idx))
            .collect()
    }

    #[instrument(level = "debug", skip(self))]
    fn org_tree(&self, employee_id: EmployeeId) -> Option<Tree<String>> {
        self.org_root(employee_id).map(|root| subtree(self, root))
    }
}

fn subtree(org: &Organization, root: Index) -> Tree<String> {
    fn build_tree(
        org: &Organization,
        node_idx: Index,
        parent_tree: &mut Tree<String>,
        seen: &mut HashSet<Index>,
    ) {
        if let Some(node) = org.node(node_idx) {
            for &report_idx in &node.reports {
                if !seen.insert(report_idx) {
                    continue;
                }
                if let Some(report) = org.node(report_idx) {
                    let mut report_tree = Tree::new(report.to_string());
                    build_tree(org, report_idx, &mut report_tree, seen);
                    parent_tree.push(report_tree);
                }
            }
        }
    }

    let label = org
        .node(root)
        .map(|node| node.to_string())
        .unwrap_or_default();
    let mut tree = Tree::new(label);
    let mut seen = HashSet::from([root]);
    build_tree(org, root, &mut tree, &mut seen);
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{build, EmployeeRecord};

    #[test]
    fn given_org_when_rendering_then_labels_carry_budgets() {
        let org = build(&[
            EmployeeRecord::new(1, None, 100),
            EmployeeRecord::new(2, Some(1), 20),
        ]);

        let trees = org.to_trees();

        assert_eq!(trees.len(), 1);
        assert_eq!(trees[0].root, "1 (100)");
        assert_eq!(trees[0].leaves.len(), 1);
        assert_eq!(trees[0].leaves[0].root, "2 (20)");
    }

    #[test]
    fn given_individual_contributor_when_rendering_org_then_rooted_at_manager() {
        let org = build(&[
            EmployeeRecord::new(1, None, 100),
            EmployeeRecord::new(2, Some(1), 20),
        ]);

        let tree = org.org_tree(2).unwrap();

        assert_eq!(tree.root, "1 (100)");
        assert!(org.org_tree(42).is_none());
    }
}
