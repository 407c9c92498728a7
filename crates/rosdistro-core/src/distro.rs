//! The resolved distribution aggregate.

use crate::stack::StackRecord;
use crate::variant::Variant;
use crate::version::normalize_version_str;
use crate::{DistroError, Result};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// A fully resolved rosdistro manifest.
///
/// Built once by the loader and read-only afterwards. Maps are ordered, so
/// every listing is deterministic.
#[derive(Debug, Clone)]
pub struct Distribution {
    stacks: BTreeMap<String, StackRecord>,
    variants: BTreeMap<String, Variant>,
    release_name: String,
    version: String,
    raw: Value,
}

impl Distribution {
    pub fn new(
        stacks: BTreeMap<String, StackRecord>,
        variants: BTreeMap<String, Variant>,
        release_name: impl Into<String>,
        version: impl Into<String>,
        raw: Value,
    ) -> Self {
        Self {
            stacks,
            variants,
            release_name: release_name.into(),
            version: version.into(),
            raw,
        }
    }

    /// Release codename (e.g., "cturtle").
    pub fn release_name(&self) -> &str {
        &self.release_name
    }

    /// Normalized distribution version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The manifest as it was decoded, for diagnostics.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn stacks(&self) -> &BTreeMap<String, StackRecord> {
        &self.stacks
    }

    pub fn variants(&self) -> &BTreeMap<String, Variant> {
        &self.variants
    }

    pub fn stack(&self, name: &str) -> Option<&StackRecord> {
        self.stacks.get(name)
    }

    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.get(name)
    }

    pub fn stack_names(&self) -> impl Iterator<Item = &str> {
        self.stacks.keys().map(String::as_str)
    }

    pub fn variant_names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    /// Stacks that carry a version.
    pub fn released_stacks(&self) -> impl Iterator<Item = &StackRecord> {
        self.stacks.values().filter(|s| s.is_released())
    }

    pub fn released_stack_names(&self) -> impl Iterator<Item = &str> {
        self.released_stacks().map(|s| s.name.as_str())
    }

    /// A stack re-expanded for another version, e.g. an older release.
    pub fn stack_at_version(&self, name: &str, version: &str) -> Result<StackRecord> {
        let stack = self
            .stack(name)
            .ok_or_else(|| DistroError::invalid(format!("unknown stack '{}'", name)))?;
        stack.with_version(Some(normalize_version_str(version)?))
    }
}
