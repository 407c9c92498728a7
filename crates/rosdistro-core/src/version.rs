//! Version string normalization.

use crate::{DistroError, Result};
use regex::Regex;
use serde_yaml::Value;
use std::sync::LazyLock;

// Legacy SVN keyword marker, e.g. `$Revision: 1234 $`
static REVISION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$Revision:\s*([0-9]*)\s*\$").unwrap());

/// Normalize a raw manifest version value.
///
/// Scalars are stringified as YAML spells them (`true`, `1.5`). An SVN
/// `$Revision: N $` marker becomes `rN`, and the result may only contain ASCII
/// letters, digits, `.`, `+` and `~`. Null and collections are rejected.
pub fn normalize_version(raw: &Value) -> Result<String> {
    let text = match raw {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(DistroError::InvalidVersion(format!("{other:?}"))),
    };
    normalize_version_str(&text)
}

/// Normalize an already stringified version.
pub fn normalize_version_str(raw: &str) -> Result<String> {
    let version = match REVISION_MARKER.captures(raw) {
        Some(caps) => format!("r{}", &caps[1]),
        None => raw.to_string(),
    };

    if !version.chars().all(is_version_char) {
        return Err(DistroError::InvalidVersion(version));
    }
    Ok(version)
}

fn is_version_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~')
}
