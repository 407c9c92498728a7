//! Variant inheritance resolution.
//!
//! Each variant's stack list is the concatenation of its parents' flattened
//! lists (in `extends` order) followed by its own `stacks`. Results are
//! memoised per name, so a parent shared by several variants is resolved once.

use crate::value::{string_list, string_or_list};
use rosdistro_core::{DistroError, Result, Variant};
use serde_yaml::Mapping;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Upper bound on the length of an `extends` chain.
pub const MAX_EXTENDS_DEPTH: usize = 64;

/// Resolves variants against the raw `name -> properties` table of a manifest.
pub struct VariantResolver<'a> {
    props: &'a BTreeMap<String, Mapping>,
    /// Resolved variants with their extends depth (0 for variants without parents).
    resolved: HashMap<String, (Variant, usize)>,
}

impl<'a> VariantResolver<'a> {
    pub fn new(props: &'a BTreeMap<String, Mapping>) -> Self {
        Self {
            props,
            resolved: HashMap::new(),
        }
    }

    /// Resolve a single variant and, transitively, its ancestors.
    pub fn resolve(&mut self, name: &str) -> Result<Variant> {
        let mut path = Vec::new();
        let (variant, _) = self.resolve_inner(name, &mut path)?;
        Ok(variant)
    }

    /// Resolve every variant in the table.
    pub fn resolve_all(mut self) -> Result<BTreeMap<String, Variant>> {
        let props = self.props;
        let mut variants = BTreeMap::new();
        for name in props.keys() {
            let variant = self.resolve(name)?;
            variants.insert(name.clone(), variant);
        }
        Ok(variants)
    }

    fn resolve_inner(&mut self, name: &str, path: &mut Vec<String>) -> Result<(Variant, usize)> {
        if let Some(resolved) = self.resolved.get(name) {
            return Ok(resolved.clone());
        }

        if let Some(start) = path.iter().position(|p| p == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name.to_string());
            return Err(DistroError::CycleDetected(cycle.join(" -> ")));
        }
        // Bounds recursion; the variant at the top of `path` is already too deep.
        if path.len() > MAX_EXTENDS_DEPTH {
            return Err(too_deep(&path[0]));
        }

        let props = self.props.get(name).ok_or_else(|| match path.last() {
            Some(child) => DistroError::invalid(format!(
                "variant '{}' extends unknown variant '{}'",
                child, name
            )),
            None => DistroError::invalid(format!("unknown variant '{}'", name)),
        })?;

        let stacks = props.get("stacks");
        let extends = props.get("extends");
        if stacks.is_none() && extends.is_none() {
            return Err(DistroError::invalid(format!(
                "variant '{}' must define 'stacks' or 'extends'",
                name
            )));
        }

        let explicit = match stacks {
            Some(value) => string_list(value, &format!("variant '{}' stacks", name))?,
            None => Vec::new(),
        };
        let parent_names = match extends {
            Some(value) => string_or_list(value, &format!("variant '{}' extends", name))?,
            None => Vec::new(),
        };

        path.push(name.to_string());
        let mut parents = Vec::with_capacity(parent_names.len());
        let mut depth = 0;
        for parent in &parent_names {
            let (variant, parent_depth) = self.resolve_inner(parent, path)?;
            depth = depth.max(parent_depth + 1);
            parents.push(variant);
        }
        path.pop();

        if depth > MAX_EXTENDS_DEPTH {
            return Err(too_deep(name));
        }

        let variant = Variant::from_parents(name, explicit, &parents);
        debug!(
            variant = %name,
            parents = ?variant.parents,
            depth,
            stacks = variant.stack_names.len(),
            "Resolved variant"
        );
        self.resolved
            .insert(name.to_string(), (variant.clone(), depth));
        Ok((variant, depth))
    }
}

fn too_deep(variant: &str) -> DistroError {
    DistroError::ExtendsTooDeep {
        variant: variant.to_string(),
        limit: MAX_EXTENDS_DEPTH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table(yaml: &str) -> BTreeMap<String, Mapping> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_single_parent() {
        let props = table(
            r#"
A: { extends: B, stacks: [x] }
B: { stacks: [y, z] }
"#,
        );
        let variant = VariantResolver::new(&props).resolve("A").unwrap();
        assert_eq!(variant.stack_names, vec!["y", "z", "x"]);
        assert_eq!(variant.explicit_stack_names, vec!["x"]);
        assert_eq!(variant.parents, vec!["B"]);
    }

    #[test]
    fn test_parent_order_and_duplicates() {
        let props = table(
            r#"
A: { extends: [B, C], stacks: [common] }
B: { stacks: [ros, common] }
C: { extends: D, stacks: [vision] }
D: { stacks: [ros] }
"#,
        );
        let variant = VariantResolver::new(&props).resolve("A").unwrap();
        assert_eq!(
            variant.stack_names,
            vec!["ros", "common", "ros", "vision", "common"]
        );
    }

    #[test]
    fn test_extends_only() {
        let props = table(
            r#"
robot: { extends: base }
base: { stacks: [ros] }
"#,
        );
        let variant = VariantResolver::new(&props).resolve("robot").unwrap();
        assert!(variant.explicit_stack_names.is_empty());
        assert_eq!(variant.stack_names, vec!["ros"]);
    }

    #[test]
    fn test_missing_stacks_and_extends() {
        let props = table("empty: { description: nothing }\n");
        let err = VariantResolver::new(&props).resolve("empty").unwrap_err();
        assert!(matches!(err, DistroError::InvalidDistro(_)));
    }

    #[test]
    fn test_unknown_parent() {
        let props = table("A: { extends: ghost }\n");
        let err = VariantResolver::new(&props).resolve("A").unwrap_err();
        assert!(err.to_string().contains("extends unknown variant 'ghost'"));
    }

    #[test]
    fn test_cycle_detected() {
        let props = table(
            r#"
A: { extends: B, stacks: [a] }
B: { extends: C, stacks: [b] }
C: { extends: A, stacks: [c] }
"#,
        );
        let err = VariantResolver::new(&props).resolve("A").unwrap_err();
        match err {
            DistroError::CycleDetected(cycle) => assert_eq!(cycle, "A -> B -> C -> A"),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_self_extension() {
        let props = table("A: { extends: A, stacks: [a] }\n");
        let err = VariantResolver::new(&props).resolve("A").unwrap_err();
        assert!(matches!(err, DistroError::CycleDetected(c) if c == "A -> A"));
    }

    #[test]
    fn test_depth_limit() {
        let mut yaml = String::from("v0: { stacks: [root] }\n");
        for i in 1..=MAX_EXTENDS_DEPTH + 1 {
            yaml.push_str(&format!("v{}: {{ extends: v{} }}\n", i, i - 1));
        }
        let props = table(&yaml);
        let top = format!("v{}", MAX_EXTENDS_DEPTH + 1);
        let err = VariantResolver::new(&props).resolve(&top).unwrap_err();
        assert!(matches!(err, DistroError::ExtendsTooDeep { .. }));

        let ok = format!("v{}", MAX_EXTENDS_DEPTH);
        let variant = VariantResolver::new(&props).resolve(&ok).unwrap();
        assert_eq!(variant.stack_names, vec!["root"]);
    }

    /// Linear chain of `len` variants; `name(0)` is the root with stacks.
    fn chain(len: usize, name: impl Fn(usize) -> String) -> BTreeMap<String, Mapping> {
        let mut yaml = format!("{}: {{ stacks: [root] }}\n", name(0));
        for i in 1..len {
            yaml.push_str(&format!("{}: {{ extends: {} }}\n", name(i), name(i - 1)));
        }
        table(&yaml)
    }

    #[test]
    fn test_depth_limit_independent_of_names() {
        for len in [MAX_EXTENDS_DEPTH + 1, MAX_EXTENDS_DEPTH + 2, MAX_EXTENDS_DEPTH + 7] {
            // root sorts first in one table and last in the other
            let root_first = chain(len, |i| format!("v{:03}", i));
            let root_last = chain(len, |i| format!("v{:03}", len - 1 - i));

            let a = VariantResolver::new(&root_first).resolve_all();
            let b = VariantResolver::new(&root_last).resolve_all();

            if len <= MAX_EXTENDS_DEPTH + 1 {
                assert_eq!(a.unwrap().len(), len);
                assert_eq!(b.unwrap().len(), len);
            } else {
                assert!(matches!(a.unwrap_err(), DistroError::ExtendsTooDeep { .. }));
                assert!(matches!(b.unwrap_err(), DistroError::ExtendsTooDeep { .. }));
            }
        }
    }

    #[test]
    fn test_resolve_all() {
        let props = table(
            r#"
base: { stacks: [ros] }
robot: { extends: base, stacks: [nav] }
"#,
        );
        let variants = VariantResolver::new(&props).resolve_all().unwrap();
        assert_eq!(variants.len(), 2);
        assert_eq!(variants["robot"].stack_names, vec!["ros", "nav"]);
        assert_eq!(variants["base"].stack_names, vec!["ros"]);
    }
}
