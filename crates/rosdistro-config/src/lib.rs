//! Manifest loading for rosdistro.
//!
//! This crate handles:
//! - Decoding manifests from files and URLs
//! - Layering stack rule sets (`_rules`)
//! - Variant inheritance resolution
//! - Assembling the resolved [`Distribution`](rosdistro_core::Distribution)

pub mod loader;
pub mod rulebook;
pub mod source;
pub mod value;
pub mod variants;

pub use loader::load_distro;
pub use rulebook::RuleBook;
pub use source::{ManifestSource, fetch_manifest, parse_manifest_str, read_manifest_file};
pub use variants::{MAX_EXTENDS_DEPTH, VariantResolver};
