//! Dependency declaration and lookup.
//!
//! - **Resolution**: [`DependencyResolver`] turns declarations into one
//!   requirement per name (last declaration wins, first position kept)
//! - **Lookup**: [`DependencyProvider`] finds each requirement in a local
//!   package cache before the toolchain is configured

mod provider;
mod resolve;

pub use provider::{DependencyProvider, LocalCache, LocatedDependency};
pub use resolve::{DependencyRequirement, DependencyResolver};
