//! Organization budget rollups.
//!
//! Builds a reporting tree from flat employee records and answers
//! "what is the budget of this employee's organization" queries.
//!
//! ```
//! use orgbudget::domain::{build, get_org_budget, EmployeeRecord};
//!
//! let org = build(&[
//!     EmployeeRecord::new(1, None, 1000),
//!     EmployeeRecord::new(2, Some(1), 500),
//! ]);
//! assert_eq!(get_org_budget(&org, 2), 1500);
//! assert_eq!(get_org_budget(&org, 404), 0);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
