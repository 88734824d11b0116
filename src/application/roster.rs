//! Roster files: the on-disk employee list
//!
//! ```toml
//! [[employee]]
//! id = 123
//! budget = 1000
//!
//! [[employee]]
//! id = 233
//! manager = 123
//! budget = 1000
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Budget, EmployeeId, EmployeeRecord};

/// One `[[employee]]` table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RosterEntry {
    pub id: EmployeeId,
    /// Absent for the CEO
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<EmployeeId>,
    pub budget: Budget,
}

impl From<RosterEntry> for EmployeeRecord {
    fn from(entry: RosterEntry) -> Self {
        EmployeeRecord::new(entry.id, entry.manager, entry.budget)
    }
}

impl From<EmployeeRecord> for RosterEntry {
    fn from(record: EmployeeRecord) -> Self {
        Self {
            id: record.employee_id,
            manager: record.manager_id,
            budget: record.budget,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Roster {
    #[serde(default, rename = "employee")]
    pub employees: Vec<RosterEntry>,
}

impl Roster {
    /// Parse roster content; `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Roster {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })
    }

    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string(self).map_err(|e| ApplicationError::OperationFailed {
            context: "serialize roster".to_string(),
            source: Box::new(e),
        })
    }

    pub fn records(&self) -> Vec<EmployeeRecord> {
        self.employees.iter().copied().map(Into::into).collect()
    }
}

impl FromIterator<EmployeeRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = EmployeeRecord>>(iter: I) -> Self {
        Self {
            employees: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_roster_without_manager_when_parsing_then_entry_is_root() {
        let content = r#"
[[employee]]
id = 1
budget = 1000

[[employee]]
id = 2
manager = 1
budget = 500
"#;
        let roster = Roster::parse(content, Path::new("roster.toml")).unwrap();

        assert_eq!(
            roster.records(),
            vec![
                EmployeeRecord::new(1, None, 1000),
                EmployeeRecord::new(2, Some(1), 500),
            ]
        );
    }

    #[test]
    fn given_empty_content_when_parsing_then_roster_is_empty() {
        let roster = Roster::parse("", Path::new("empty.toml")).unwrap();
        assert!(roster.employees.is_empty());
    }

    #[test]
    fn given_missing_budget_when_parsing_then_errors_with_path() {
        let content = "[[employee]]\nid = 1\n";
        let err = Roster::parse(content, Path::new("bad.toml")).unwrap_err();

        assert!(matches!(err, ApplicationError::Roster { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn given_records_when_serializing_then_omits_absent_manager() {
        let roster: Roster = vec![
            EmployeeRecord::new(1, None, 10),
            EmployeeRecord::new(2, Some(1), 20),
        ]
        .into_iter()
        .collect();

        let content = roster.to_toml().unwrap();

        assert_eq!(content.matches("manager").count(), 1);
        assert_eq!(Roster::parse(&content, Path::new("x")).unwrap(), roster);
    }
}
