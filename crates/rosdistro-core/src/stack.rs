//! Stack release records.

use crate::Result;
use crate::rules::RuleContext;
use crate::vcs::{Branch, BranchLocation, VcsConfig, load_vcs_config};
use serde_yaml::Mapping;

/// Release metadata for one stack of a distribution.
#[derive(Debug, Clone)]
pub struct StackRecord {
    /// Stack name, unique within a distribution.
    pub name: String,
    /// Normalized version. `None` for unreleased stacks.
    pub version: Option<String>,
    /// Expanded VCS configuration, if the rules name a VCS.
    pub vcs_config: Option<VcsConfig>,
    /// Free-form repository label copied from the rules.
    pub repo: Option<String>,
    rules: Mapping,
    release_name: String,
}

impl StackRecord {
    /// Build a record, expanding `rules` for `version` within `release_name`.
    pub fn new(
        name: impl Into<String>,
        rules: Mapping,
        version: Option<String>,
        release_name: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let release_name = release_name.into();
        let version = version.filter(|v| !v.is_empty());

        let ctx = RuleContext::new(&name, version.as_deref(), &release_name);
        let vcs_config = load_vcs_config(&rules, &ctx)?;
        let repo = rules.get("repo").and_then(|v| v.as_str()).map(str::to_string);

        Ok(Self {
            name,
            version,
            vcs_config,
            repo,
            rules,
            release_name,
        })
    }

    /// The same stack re-expanded for another version.
    pub fn with_version(&self, version: Option<String>) -> Result<Self> {
        Self::new(
            self.name.clone(),
            self.rules.clone(),
            version,
            self.release_name.clone(),
        )
    }

    pub fn is_released(&self) -> bool {
        self.version.is_some()
    }

    /// Expand an arbitrary rule in this stack's context, optionally with a build revision.
    pub fn expand_rule(&self, rule: &str, revision: Option<&str>) -> Result<String> {
        let ctx = RuleContext {
            revision,
            ..RuleContext::new(&self.name, self.version.as_deref(), &self.release_name)
        };
        ctx.expand(rule)
    }

    /// Checkout location for `branch`, if the stack has VCS rules.
    pub fn branch(&self, branch: Branch, anonymous: bool) -> Option<BranchLocation> {
        self.vcs_config
            .as_ref()
            .map(|cfg| cfg.branch(branch, anonymous))
    }
}

impl PartialEq for StackRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version && self.vcs_config == other.vcs_config
    }
}

impl Eq for StackRecord {}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_rules() -> Mapping {
        serde_yaml::from_str(
            r#"
repo: example-pkg
git:
  uri: 'https://example.org/$STACK_NAME.git'
  dev-branch: master
  distro-tag: '$RELEASE_NAME'
  release-tag: '$STACK_NAME-$STACK_VERSION'
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_new_record() {
        let stack = StackRecord::new("perception", git_rules(), Some("1.4.0".into()), "electric")
            .unwrap();
        assert_eq!(stack.name, "perception");
        assert_eq!(stack.version.as_deref(), Some("1.4.0"));
        assert_eq!(stack.repo.as_deref(), Some("example-pkg"));
        assert!(stack.is_released());

        let release = stack.branch(Branch::Release, false).unwrap();
        assert_eq!(release.uri, "https://example.org/perception.git");
        assert_eq!(release.tag.as_deref(), Some("perception-1.4.0"));
    }

    #[test]
    fn test_unreleased_record() {
        let stack = StackRecord::new("perception", git_rules(), None, "electric").unwrap();
        assert!(!stack.is_released());
        let release = stack.branch(Branch::Release, false).unwrap();
        assert_eq!(release.tag.as_deref(), Some("perception-$STACK_VERSION"));

        let empty = StackRecord::new("perception", git_rules(), Some(String::new()), "electric")
            .unwrap();
        assert!(!empty.is_released());
    }

    #[test]
    fn test_with_version() {
        let stack = StackRecord::new("perception", git_rules(), Some("1.4.0".into()), "electric")
            .unwrap();
        let older = stack.with_version(Some("1.2.0".into())).unwrap();

        assert_eq!(older.name, stack.name);
        assert_eq!(older.version.as_deref(), Some("1.2.0"));
        assert_eq!(
            older.branch(Branch::Release, false).unwrap().tag.as_deref(),
            Some("perception-1.2.0")
        );
        assert_ne!(older, stack);
        assert_eq!(older.with_version(Some("1.4.0".into())).unwrap(), stack);
    }

    #[test]
    fn test_equality_ignores_repo_label() {
        let a = StackRecord::new("perception", git_rules(), Some("1.0".into()), "electric").unwrap();
        let mut rules = git_rules();
        rules.remove("repo");
        let b = StackRecord::new("perception", rules, Some("1.0".into()), "electric").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_expand_rule_with_revision() {
        let stack = StackRecord::new("perception", git_rules(), Some("1.4.0".into()), "electric")
            .unwrap();
        assert!(stack.expand_rule("build/$REVISION", None).is_err());
        assert_eq!(
            stack
                .expand_rule("$RELEASE_NAME/$STACK_NAME@$REVISION", Some("501"))
                .unwrap(),
            "electric/perception@501"
        );
    }
}
