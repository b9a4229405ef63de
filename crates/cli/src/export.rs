use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};
use watchface_core::{ScenarioDescriptor, TimeAnchor, iso_date};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Index<'a> {
    anchor: String,
    scenarios: Vec<IndexEntry<'a>>,
}

#[derive(Serialize)]
struct IndexEntry<'a> {
    name: &'a str,
    file: String,
    enabled: bool,
    doc: &'a str,
}

/// Write `<name>.json` for each scenario and an `index.json` listing them.
/// Returns how many scenario files were written.
pub fn write_all(
    dir: &Path,
    anchor: &TimeAnchor,
    scenarios: &[ScenarioDescriptor],
    include_disabled: bool,
) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut entries = Vec::new();
    for s in scenarios {
        if !s.enabled && !include_disabled {
            info!("Skipping disabled scenario {}", s.name);
            continue;
        }
        let file = format!("{}.json", s.name);
        let path = dir.join(&file);
        let json = serde_json::to_string_pretty(&s.to_json()?)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        debug!(scenario = %s.name, path = %path.display(), "exported");
        entries.push(IndexEntry {
            name: &s.name,
            file,
            enabled: s.enabled,
            doc: &s.doc,
        });
    }

    let written = entries.len();
    let index = Index {
        anchor: iso_date(anchor.now()),
        scenarios: entries,
    };
    let path = dir.join("index.json");
    fs::write(&path, serde_json::to_string_pretty(&index)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use watchface_core::{LayoutRegistry, catalog};

    #[test]
    fn export_skips_disabled_by_default() {
        let anchor =
            TimeAnchor::at(DateTime::parse_from_rfc3339("2026-10-19T12:00:00+00:00").unwrap());
        let registry = LayoutRegistry::builtin().unwrap();
        let scenarios = catalog(&anchor, registry).unwrap();
        let dir = std::env::temp_dir().join(format!("watchface-export-{}", std::process::id()));

        let written = write_all(&dir, &anchor, &scenarios, false).unwrap();
        assert_eq!(written, scenarios.iter().filter(|s| s.enabled).count());
        assert!(!dir.join("TestRecencySuperOld.json").exists());

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("index.json")).unwrap()).unwrap();
        assert_eq!(index["anchor"], "2026-10-19T12:00:00+00:00");
        assert_eq!(index["scenarios"].as_array().unwrap().len(), written);

        let one: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.join("TestMmol.json")).unwrap()).unwrap();
        assert_eq!(one["config"]["mmol"], true);

        write_all(&dir, &anchor, &scenarios, true).unwrap();
        assert!(dir.join("TestRecencySuperOld.json").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
