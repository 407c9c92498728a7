//! Stack commands.

use anyhow::{Result, anyhow};
use rosdistro_core::{Branch, BranchLocation, StackRecord, VcsKind};
use serde::Serialize;

use super::load;

pub async fn list(location: &str, released: bool, vcs: Option<VcsKind>) -> Result<()> {
    let distro = load(location).await?;
    let names: Vec<&str> = if released {
        distro.released_stack_names().collect()
    } else {
        distro.stack_names().collect()
    };
    for name in names {
        if let Some(kind) = vcs {
            let stack_kind = distro
                .stack(name)
                .and_then(|stack| stack.vcs_config.as_ref())
                .map(|cfg| cfg.kind());
            if stack_kind != Some(kind) {
                continue;
            }
        }
        println!("{}", name);
    }
    Ok(())
}

/// Which checkout locations `show` prints.
#[derive(Debug, Clone, Copy, Default)]
pub struct Checkout {
    /// Only this branch; all of them when `None`.
    pub branch: Option<Branch>,
    pub anonymous: bool,
}

impl Checkout {
    fn location(&self, stack: &StackRecord, branch: Branch) -> Option<BranchLocation> {
        if self.branch.is_none_or(|selected| selected == branch) {
            stack.branch(branch, self.anonymous)
        } else {
            None
        }
    }
}

#[derive(Serialize)]
struct StackView<'a> {
    name: &'a str,
    version: Option<&'a str>,
    repo: Option<&'a str>,
    vcs: Option<VcsKind>,
    devel: Option<BranchLocation>,
    distro: Option<BranchLocation>,
    release: Option<BranchLocation>,
}

impl<'a> StackView<'a> {
    fn new(stack: &'a StackRecord, checkout: Checkout) -> Self {
        Self {
            name: &stack.name,
            version: stack.version.as_deref(),
            repo: stack.repo.as_deref(),
            vcs: stack.vcs_config.as_ref().map(|cfg| cfg.kind()),
            devel: checkout.location(stack, Branch::Devel),
            distro: checkout.location(stack, Branch::Distro),
            release: checkout.location(stack, Branch::Release),
        }
    }

    fn location(&self, branch: Branch) -> Option<&BranchLocation> {
        match branch {
            Branch::Devel => self.devel.as_ref(),
            Branch::Distro => self.distro.as_ref(),
            Branch::Release => self.release.as_ref(),
        }
    }
}

pub async fn show(
    location: &str,
    name: &str,
    version: Option<&str>,
    checkout: Checkout,
    json: bool,
) -> Result<()> {
    let distro = load(location).await?;
    let stack = match version {
        Some(version) => distro.stack_at_version(name, version)?,
        None => distro
            .stack(name)
            .cloned()
            .ok_or_else(|| anyhow!("stack '{}' not found in {}", name, distro.release_name()))?,
    };

    let view = StackView::new(&stack, checkout);
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("{}", view.name);
    println!("  version: {}", view.version.unwrap_or("(unreleased)"));
    if let Some(repo) = view.repo {
        println!("  repo:    {}", repo);
    }
    match view.vcs {
        Some(kind) => println!("  vcs:     {}", kind),
        None => println!("  vcs:     (none)"),
    }
    for branch in Branch::ALL {
        if let Some(loc) = view.location(branch) {
            match &loc.tag {
                Some(tag) => println!("  {:<8} {} @ {}", branch, loc.uri, tag),
                None => println!("  {:<8} {}", branch, loc.uri),
            }
        }
    }
    Ok(())
}
