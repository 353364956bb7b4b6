use std::path::Path;

use anyhow::Context;
use latency_grader_core::prelude::{HttpMethod, RequestSpec, Scenario, ScenarioCatalog};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<ScenarioEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioEntry {
    name: String,
    #[serde(default)]
    method: HttpMethod,
    path: String,
    #[serde(default)]
    query: Vec<(String, String)>,
    target_ms: f64,
}

/// Parse a scenario catalog from TOML.
///
/// Scenarios keep the order they are written in.
///
/// ```toml
/// [[scenario]]
/// name = "4. Partitioning / Telemetry"
/// path = "/telemetry/truck/TRK-9821"
/// query = [["limit", "100"]]
/// target_ms = 50
/// ```
pub fn parse_catalog(content: &str) -> anyhow::Result<ScenarioCatalog> {
    let file: CatalogFile = toml::from_str(content).context("Invalid scenario catalog")?;

    let scenarios = file
        .scenarios
        .into_iter()
        .map(|entry| {
            let request = RequestSpec {
                method: entry.method,
                path: entry.path,
                query: entry.query,
            };
            Scenario::new(entry.name, request, entry.target_ms)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ScenarioCatalog::new(scenarios)?)
}

/// Load a scenario catalog from a TOML file. See [parse_catalog] for the format.
pub fn load_catalog(path: &Path) -> anyhow::Result<ScenarioCatalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario catalog {}", path.display()))?;

    parse_catalog(&content).with_context(|| format!("Failed to load {}", path.display()))
}
