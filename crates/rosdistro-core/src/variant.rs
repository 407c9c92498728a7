//! Variant definitions.

use serde::Serialize;

/// A named set of stacks ("metapackage"), optionally extending other variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Variant {
    /// Variant name (e.g., "base", "pr2").
    pub name: String,
    /// Variants this one extends, in declaration order.
    pub parents: Vec<String>,
    /// Stacks listed directly on this variant.
    pub explicit_stack_names: Vec<String>,
    /// Inherited stacks followed by the explicit ones. Duplicates are kept.
    pub stack_names: Vec<String>,
}

impl Variant {
    /// Assemble a variant from its own stacks and its already flattened parents.
    ///
    /// Parent lists are concatenated in the given order, then `explicit_stack_names`.
    pub fn from_parents<'a>(
        name: impl Into<String>,
        explicit_stack_names: Vec<String>,
        parents: impl IntoIterator<Item = &'a Variant>,
    ) -> Self {
        let mut parent_names = Vec::new();
        let mut stack_names = Vec::new();
        for parent in parents {
            parent_names.push(parent.name.clone());
            stack_names.extend(parent.stack_names.iter().cloned());
        }
        stack_names.extend(explicit_stack_names.iter().cloned());

        Self {
            name: name.into(),
            parents: parent_names,
            explicit_stack_names,
            stack_names,
        }
    }

    pub fn extends(&self, variant: &str) -> bool {
        self.parents.iter().any(|p| p == variant)
    }

    pub fn contains_stack(&self, stack: &str) -> bool {
        self.stack_names.iter().any(|s| s == stack)
    }
}
