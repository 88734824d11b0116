//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod budget;
pub mod builder;
pub mod entities;
pub mod error;

pub use arena::{OrgNode, Organization, PostOrderIterator, SubtreeIterator};
pub use budget::get_org_budget;
pub use builder::{build, OrgBuilder};
pub use entities::*;
pub use error::{DomainError, DomainResult};
