//! Version-control configuration derived from stack rules.
//!
//! A stack's rules carry one VCS section keyed by the tool name (`svn`, `git`,
//! `hg` or `bzr`). Every string in that section is a rule template that is
//! expanded with the stack's [`RuleContext`].

use crate::rules::RuleContext;
use crate::{DistroError, Result};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

/// Version control tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    Svn,
    Git,
    Hg,
    Bzr,
}

impl VcsKind {
    /// Lookup order when a rule set names more than one tool.
    pub const ALL: [VcsKind; 4] = [VcsKind::Svn, VcsKind::Git, VcsKind::Hg, VcsKind::Bzr];

    pub fn as_str(&self) -> &'static str {
        match self {
            VcsKind::Svn => "svn",
            VcsKind::Git => "git",
            VcsKind::Hg => "hg",
            VcsKind::Bzr => "bzr",
        }
    }
}

impl std::fmt::Display for VcsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VcsKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svn" => Ok(VcsKind::Svn),
            "git" => Ok(VcsKind::Git),
            "hg" => Ok(VcsKind::Hg),
            "bzr" => Ok(VcsKind::Bzr),
            _ => Err(format!("Unknown vcs type: {}", s)),
        }
    }
}

/// Which line of development to check out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    /// Development head.
    Devel,
    /// Tag tracking the distribution release.
    Distro,
    /// Tag of the stack's own release.
    Release,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Devel, Branch::Distro, Branch::Release];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Devel => "devel",
            Branch::Distro => "distro",
            Branch::Release => "release",
        }
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Branch {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "devel" => Ok(Branch::Devel),
            "distro" => Ok(Branch::Distro),
            "release" => Ok(Branch::Release),
            _ => Err(format!("Unknown branch: {}", s)),
        }
    }
}

/// A resolved checkout location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchLocation {
    pub uri: String,
    /// Branch or tag to check out. Subversion encodes this in the URI instead.
    pub tag: Option<String>,
}

/// Expanded Subversion rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnConfig {
    pub dev: String,
    pub distro_tag: String,
    pub release_tag: String,
    pub anon_dev: String,
    pub anon_distro_tag: String,
    pub anon_release_tag: String,
}

/// Expanded rules for a distributed VCS (git, hg, bzr).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DvcsConfig {
    pub kind: VcsKind,
    pub uri: String,
    pub anon_uri: String,
    pub dev_branch: String,
    pub distro_tag: String,
    pub release_tag: String,
}

/// Fully expanded VCS configuration of a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsConfig {
    Svn(SvnConfig),
    Dvcs(DvcsConfig),
}

impl VcsConfig {
    pub fn kind(&self) -> VcsKind {
        match self {
            VcsConfig::Svn(_) => VcsKind::Svn,
            VcsConfig::Dvcs(cfg) => cfg.kind,
        }
    }

    /// Checkout location for `branch`, using the read-only URIs when `anonymous`.
    pub fn branch(&self, branch: Branch, anonymous: bool) -> BranchLocation {
        match self {
            VcsConfig::Svn(svn) => {
                let uri = match (branch, anonymous) {
                    (Branch::Devel, false) => &svn.dev,
                    (Branch::Devel, true) => &svn.anon_dev,
                    (Branch::Distro, false) => &svn.distro_tag,
                    (Branch::Distro, true) => &svn.anon_distro_tag,
                    (Branch::Release, false) => &svn.release_tag,
                    (Branch::Release, true) => &svn.anon_release_tag,
                };
                BranchLocation {
                    uri: uri.clone(),
                    tag: None,
                }
            }
            VcsConfig::Dvcs(dvcs) => {
                let tag = match branch {
                    Branch::Devel => &dvcs.dev_branch,
                    Branch::Distro => &dvcs.distro_tag,
                    Branch::Release => &dvcs.release_tag,
                };
                let uri = if anonymous { &dvcs.anon_uri } else { &dvcs.uri };
                BranchLocation {
                    uri: uri.clone(),
                    tag: Some(tag.clone()),
                }
            }
        }
    }
}

/// Build the VCS configuration from a stack's rules.
///
/// Returns `Ok(None)` when the rules name no VCS tool.
pub fn load_vcs_config(rules: &Mapping, ctx: &RuleContext<'_>) -> Result<Option<VcsConfig>> {
    let Some((kind, section)) = VcsKind::ALL
        .iter()
        .find_map(|kind| rules.get(kind.as_str()).map(|v| (*kind, v)))
    else {
        return Ok(None);
    };

    let section = section.as_mapping().ok_or_else(|| {
        DistroError::invalid(format!(
            "{} rules for stack '{}' must be a mapping",
            kind, ctx.stack_name
        ))
    })?;
    debug!(stack = %ctx.stack_name, vcs = %kind, "Loading vcs rules");

    let rules = SectionRules {
        kind,
        section,
        ctx,
    };
    let config = match kind {
        VcsKind::Svn => VcsConfig::Svn(rules.svn()?),
        _ => VcsConfig::Dvcs(rules.dvcs()?),
    };
    Ok(Some(config))
}

struct SectionRules<'a> {
    kind: VcsKind,
    section: &'a Mapping,
    ctx: &'a RuleContext<'a>,
}

impl SectionRules<'_> {
    fn optional(&self, key: &str) -> Result<Option<String>> {
        match self.section.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(rule)) => self.ctx.expand(rule).map(Some),
            Some(_) => Err(DistroError::invalid(format!(
                "{} rule '{}' for stack '{}' must be a string",
                self.kind, key, self.ctx.stack_name
            ))),
        }
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)?.ok_or_else(|| {
            DistroError::invalid(format!(
                "{} rules for stack '{}' missing required '{}' key",
                self.kind, self.ctx.stack_name, key
            ))
        })
    }

    fn svn(&self) -> Result<SvnConfig> {
        let dev = self.required("dev")?;
        let distro_tag = self.required("distro-tag")?;
        let release_tag = self.required("release-tag")?;

        // Anonymous URLs come as a complete set or not at all.
        let (anon_dev, anon_distro_tag, anon_release_tag) = match self.optional("anon-dev")? {
            Some(anon_dev) => (
                anon_dev,
                self.required("anon-distro-tag")?,
                self.required("anon-release-tag")?,
            ),
            None => (dev.clone(), distro_tag.clone(), release_tag.clone()),
        };

        Ok(SvnConfig {
            dev,
            distro_tag,
            release_tag,
            anon_dev,
            anon_distro_tag,
            anon_release_tag,
        })
    }

    fn dvcs(&self) -> Result<DvcsConfig> {
        let uri = self.required("uri")?;
        let anon_uri = self.optional("anon-uri")?.unwrap_or_else(|| uri.clone());
        Ok(DvcsConfig {
            kind: self.kind,
            uri,
            anon_uri,
            dev_branch: self.required("dev-branch")?,
            distro_tag: self.required("distro-tag")?,
            release_tag: self.required("release-tag")?,
        })
    }
}
