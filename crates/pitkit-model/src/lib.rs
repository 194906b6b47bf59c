//! Shared build-unit and code-element model types used across pitkit.
//!
//! Nothing in this crate performs I/O. Build units are stored in an immutable
//! arena ([`BuildUnitTree`]) that is rebuilt wholesale on every project scan;
//! code elements are transient values created per resolution request.

mod element;
mod guard;
mod model;
pub mod names;
mod options;
mod tree;

pub use element::{format_targets, CodeClass, CodeElement, CodePackage};
pub use guard::ReadGuard;
pub use model::*;
pub use options::MutationCoverageOptions;
pub use tree::BuildUnitTree;
