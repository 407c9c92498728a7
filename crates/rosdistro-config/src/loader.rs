//! Distribution loading from a decoded manifest.

use crate::rulebook::RuleBook;
use crate::value::{key_string, require_mapping, scalar_string};
use crate::variants::VariantResolver;
use rosdistro_core::{
    DistroError, Distribution, Result, StackRecord, normalize_version, normalize_version_str,
};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Version assumed when the manifest has none.
const DEFAULT_VERSION: &str = "0";

/// Build a [`Distribution`] from a decoded rosdistro manifest.
pub fn load_distro(raw: Value) -> Result<Distribution> {
    let root = require_mapping(&raw, "distro manifest")?;

    let stack_props = root
        .get("stacks")
        .ok_or_else(|| DistroError::MissingKey("stacks".to_string()))?;
    let stack_props = require_mapping(stack_props, "'stacks'")?;

    let release_name = root
        .get("release")
        .ok_or_else(|| DistroError::MissingKey("release".to_string()))?;
    let release_name = scalar_string(release_name)
        .ok_or_else(|| DistroError::invalid("'release' must be a string"))?;

    let version = match root.get("version") {
        Some(value) => normalize_version(value)?,
        None => normalize_version_str(DEFAULT_VERSION)?,
    };

    let variant_props = collect_variants(root.get("variants"))?;

    let rulebook = RuleBook::from_manifest(root, stack_props)?;
    let stacks = load_stacks(stack_props, &rulebook, &release_name)?;
    let variants = VariantResolver::new(&variant_props).resolve_all()?;

    info!(
        release = %release_name,
        version = %version,
        stacks = stacks.len(),
        variants = variants.len(),
        "Loaded distro"
    );

    Ok(Distribution::new(
        stacks,
        variants,
        release_name,
        version,
        raw,
    ))
}

fn load_stacks(
    stack_props: &Mapping,
    rulebook: &RuleBook,
    release_name: &str,
) -> Result<BTreeMap<String, StackRecord>> {
    let mut stacks = BTreeMap::new();

    for (key, props) in stack_props {
        let name = key_string(key, "stack")?;
        // underscore keys are reserved (e.g. `_rules`)
        if name.starts_with('_') {
            continue;
        }

        let empty = Mapping::new();
        let props = match props {
            Value::Null => &empty,
            other => require_mapping(other, &format!("stack '{}'", name))?,
        };

        let version = match props.get("version") {
            None | Some(Value::Null) => None,
            Some(value) => Some(normalize_version(value)?),
        };
        let rules = rulebook.rules_for(&name, props)?;
        debug!(stack = %name, version = ?version, "Loading stack");

        let record = StackRecord::new(name.clone(), rules, version, release_name)?;
        stacks.insert(name, record);
    }

    Ok(stacks)
}

/// Flatten the `variants` list of single-key mappings into a `name -> properties` table.
fn collect_variants(variants: Option<&Value>) -> Result<BTreeMap<String, Mapping>> {
    let mut table = BTreeMap::new();
    let entries = match variants {
        None | Some(Value::Null) => return Ok(table),
        Some(Value::Sequence(entries)) => entries,
        Some(_) => return Err(DistroError::invalid("'variants' must be a list")),
    };

    for entry in entries {
        let spec = match entry.as_mapping() {
            Some(spec) if spec.len() == 1 => spec,
            _ => {
                return Err(DistroError::invalid(format!(
                    "invalid variant spec: {:?}",
                    entry
                )));
            }
        };

        for (key, props) in spec {
            let name = key_string(key, "variant")?;
            let props = match props {
                Value::Null => Mapping::new(),
                other => require_mapping(other, &format!("variant '{}'", name))?.clone(),
            };
            if table.insert(name.clone(), props).is_some() {
                return Err(DistroError::invalid(format!(
                    "duplicate variant definition: {}",
                    name
                )));
            }
        }
    }

    Ok(table)
}
