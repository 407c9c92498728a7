//! Core domain types for rosdistro manifests.
//!
//! This crate contains:
//! - Rule template expansion (`$STACK_NAME`, `$STACK_VERSION`, ...)
//! - Version string normalization
//! - VCS configuration derived from stack rules
//! - Stack, variant and distribution types
//! - The shared error type

pub mod distro;
pub mod error;
pub mod rules;
pub mod stack;
pub mod variant;
pub mod vcs;
pub mod version;

pub use distro::Distribution;
pub use error::{DistroError, Result};
pub use rules::{RuleContext, expand_rule};
pub use stack::StackRecord;
pub use variant::Variant;
pub use vcs::{Branch, BranchLocation, VcsConfig, VcsKind};
pub use version::{normalize_version, normalize_version_str};
