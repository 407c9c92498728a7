//! Layered rule sets for stacks.
//!
//! A manifest can declare reusable rule sets once and let stacks refer to them:
//!
//! ```yaml
//! _rules:
//!   wg-git:               # named rule set
//!     git: { uri: ..., dev-branch: ..., distro-tag: ..., release-tag: ... }
//! stacks:
//!   _rules:               # default rule set for every stack
//!     svn: { dev: ..., distro-tag: ..., release-tag: ... }
//!   ros:
//!     version: 1.2.0      # uses the default rule set
//!   vision:
//!     _rules: wg-git      # uses a named rule set
//!     version: 0.4.0
//!   navigation:
//!     _rules:             # inline rule set
//!       hg: { ... }
//! ```
//!
//! Keys on the stack entry itself (other than `version` and `_rules`) are
//! overlaid on top of the chosen rule set.

use crate::value::key_string;
use rosdistro_core::{DistroError, Result};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;

/// Reserved key holding rule sets.
pub const RULES_KEY: &str = "_rules";

/// Stack entry keys that are not rules.
const STACK_META_KEYS: [&str; 2] = ["version", RULES_KEY];

/// Base rule sets of a manifest, resolved once before any stack is expanded.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    named: BTreeMap<String, Mapping>,
    default: Mapping,
}

impl RuleBook {
    /// Collect named rule sets from the top-level `_rules` and the default set from `stacks._rules`.
    pub fn from_manifest(root: &Mapping, stacks: &Mapping) -> Result<Self> {
        let mut named = BTreeMap::new();
        if let Some(sets) = root.get(RULES_KEY) {
            let sets = sets.as_mapping().ok_or_else(|| {
                DistroError::invalid("top-level '_rules' must map names to rule sets")
            })?;
            for (key, rules) in sets {
                let name = key_string(key, "rule set")?;
                let rules = rules.as_mapping().ok_or_else(|| {
                    DistroError::invalid(format!("rule set '{}' must be a mapping", name))
                })?;
                named.insert(name, rules.clone());
            }
        }

        let default = match stacks.get(RULES_KEY) {
            None | Some(Value::Null) => Mapping::new(),
            Some(Value::Mapping(rules)) => rules.clone(),
            Some(_) => return Err(DistroError::invalid("'stacks._rules' must be a mapping")),
        };

        Ok(Self { named, default })
    }

    pub fn named(&self, name: &str) -> Option<&Mapping> {
        self.named.get(name)
    }

    /// Effective rules for one stack entry.
    pub fn rules_for(&self, stack_name: &str, props: &Mapping) -> Result<Mapping> {
        let mut rules = match props.get(RULES_KEY) {
            None | Some(Value::Null) => self.default.clone(),
            Some(Value::Mapping(inline)) => inline.clone(),
            Some(Value::String(name)) => self.named(name).cloned().ok_or_else(|| {
                DistroError::invalid(format!(
                    "stack '{}' refers to unknown rule set '{}'",
                    stack_name, name
                ))
            })?,
            Some(other) => {
                return Err(DistroError::invalid(format!(
                    "stack '{}' has invalid '_rules' value: {:?}",
                    stack_name, other
                )));
            }
        };

        for (key, value) in props {
            let is_meta = key
                .as_str()
                .is_some_and(|k| STACK_META_KEYS.contains(&k));
            if !is_meta {
                rules.insert(key.clone(), value.clone());
            }
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
_rules:
  wg-git:
    git:
      uri: 'https://example.org/$STACK_NAME.git'
      dev-branch: master
      distro-tag: '$RELEASE_NAME'
      release-tag: '$STACK_NAME-$STACK_VERSION'
stacks:
  _rules:
    svn:
      dev: 'https://svn/$STACK_NAME/trunk'
      distro-tag: 'https://svn/$STACK_NAME/tags/$RELEASE_NAME'
      release-tag: 'https://svn/$STACK_NAME/tags/$STACK_VERSION'
  ros:
    version: 1.2.0
    repo: ros
  vision:
    _rules: wg-git
    version: 0.4.0
  navigation:
    _rules:
      hg:
        uri: 'https://hg/$STACK_NAME'
  broken:
    _rules: missing
"#;

    fn book() -> (RuleBook, Mapping) {
        let root: Mapping = serde_yaml::from_str(MANIFEST).unwrap();
        let stacks = root.get("stacks").unwrap().as_mapping().unwrap().clone();
        (RuleBook::from_manifest(&root, &stacks).unwrap(), stacks)
    }

    fn props<'a>(stacks: &'a Mapping, name: &str) -> &'a Mapping {
        stacks.get(name).unwrap().as_mapping().unwrap()
    }

    #[test]
    fn test_default_rules_with_overlay() {
        let (book, stacks) = book();
        let rules = book.rules_for("ros", props(&stacks, "ros")).unwrap();
        assert!(rules.contains_key("svn"));
        assert_eq!(rules.get("repo").and_then(Value::as_str), Some("ros"));
        assert!(!rules.contains_key("version"));
    }

    #[test]
    fn test_named_rule_set() {
        let (book, stacks) = book();
        let rules = book.rules_for("vision", props(&stacks, "vision")).unwrap();
        assert!(rules.contains_key("git"));
        assert!(!rules.contains_key("svn"));
        assert!(!rules.contains_key(RULES_KEY));
    }

    #[test]
    fn test_inline_rule_set() {
        let (book, stacks) = book();
        let rules = book
            .rules_for("navigation", props(&stacks, "navigation"))
            .unwrap();
        assert!(rules.contains_key("hg"));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn test_unknown_rule_set() {
        let (book, stacks) = book();
        let err = book.rules_for("broken", props(&stacks, "broken")).unwrap_err();
        assert!(err.to_string().contains("unknown rule set 'missing'"));
    }
}
