//! Variable substitution for stack repository rules.
//!
//! Supports placeholders like:
//! - `$STACK_NAME` - Name of the stack the rule belongs to
//! - `$STACK_VERSION` - Released version of the stack (left as-is when unreleased)
//! - `$RELEASE_NAME` - Release codename of the distribution
//! - `$REVISION` - Build revision, only available when a release tool supplies one

use crate::{DistroError, Result};

const STACK_NAME: &str = "$STACK_NAME";
const STACK_VERSION: &str = "$STACK_VERSION";
const RELEASE_NAME: &str = "$RELEASE_NAME";
const REVISION: &str = "$REVISION";

/// Expand all placeholders in a rule template.
///
/// Fails with [`DistroError::MissingRevision`] when the expanded text still
/// references `$REVISION` and no revision was given. A template whose very
/// first token is `$REVISION` is let through unexpanded; existing manifests
/// depend on that leniency.
pub fn expand_rule(
    rule: &str,
    stack_name: &str,
    stack_version: Option<&str>,
    release_name: &str,
    revision: Option<&str>,
) -> Result<String> {
    let mut expanded = rule.replace(STACK_NAME, stack_name);
    if let Some(version) = stack_version.filter(|v| !v.is_empty()) {
        expanded = expanded.replace(STACK_VERSION, version);
    }
    expanded = expanded.replace(RELEASE_NAME, release_name);

    match revision.filter(|r| !r.is_empty()) {
        Some(revision) => Ok(expanded.replace(REVISION, revision)),
        None if expanded.find(REVISION).is_some_and(|idx| idx > 0) => {
            Err(DistroError::MissingRevision {
                rule: rule.to_string(),
            })
        }
        None => Ok(expanded),
    }
}

/// The substitution values for one stack, passed explicitly to [`expand_rule`].
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub stack_name: &'a str,
    pub stack_version: Option<&'a str>,
    pub release_name: &'a str,
    pub revision: Option<&'a str>,
}

impl<'a> RuleContext<'a> {
    pub fn new(stack_name: &'a str, stack_version: Option<&'a str>, release_name: &'a str) -> Self {
        Self {
            stack_name,
            stack_version,
            release_name,
            revision: None,
        }
    }

    /// Same context with a build revision attached.
    pub fn with_revision(self, revision: &'a str) -> Self {
        Self {
            revision: Some(revision),
            ..self
        }
    }

    pub fn expand(&self, rule: &str) -> Result<String> {
        expand_rule(
            rule,
            self.stack_name,
            self.stack_version,
            self.release_name,
            self.revision,
        )
    }
}
