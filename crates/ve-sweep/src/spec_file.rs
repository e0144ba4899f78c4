//! Loading parameter specifications from disk

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use ve_experiment::ParamSpec;

/// Read a specification file
///
/// `.json` files are parsed as JSON, everything else as YAML.
pub(crate) fn load_spec(path: &Path) -> Result<ParamSpec> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let spec = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("invalid JSON parameters in {}", path.display()))?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("invalid YAML parameters in {}", path.display()))?
    };
    tracing::debug!("Loaded parameters from {}", path.display());
    Ok(spec)
}
