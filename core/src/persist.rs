use crate::classifier::{FeatureResult, ProductTraces};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::Path;

pub const REPORT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub created_at: String,
    pub version: u32,
    pub num_products: usize,
    pub num_features: usize,
}

/// Classification output of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    pub features: BTreeMap<String, FeatureResult>,
}

impl Report {
    pub fn new(num_products: usize, features: BTreeMap<String, FeatureResult>) -> Self {
        let meta = ReportMeta {
            created_at: time::OffsetDateTime::now_utc()
                .format(&time::format_description::well_known::Rfc3339)
                .unwrap_or_else(|_| "".into()),
            version: REPORT_VERSION,
            num_products,
            num_features: features.len(),
        };
        Self { meta, features }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        create_dir_all(dir)?;
    }
    let mut f = File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    let json = serde_json::to_string_pretty(value)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let mut f = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf)?;
    let value = serde_json::from_str(&buf).with_context(|| format!("invalid JSON in {}", path.display()))?;
    Ok(value)
}

pub fn save_traces(path: &Path, traces: &ProductTraces) -> Result<()> {
    write_json(path, traces)
}

pub fn load_traces(path: &Path) -> Result<ProductTraces> {
    read_json(path)
}

pub fn save_report(path: &Path, report: &Report) -> Result<()> {
    write_json(path, report)
}

pub fn load_report(path: &Path) -> Result<Report> {
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use std::collections::BTreeSet;

    #[test]
    fn report_is_written_under_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut traces = ProductTraces::new();
        traces
            .entry("P1".into())
            .or_default()
            .insert("logging".into(), BTreeSet::from(["src/log.c".to_string()]));

        let path = dir.path().join("out/nested/report.json");
        save_report(&path, &Report::new(traces.len(), classify(&traces))).unwrap();
        let report = load_report(&path).unwrap();
        assert_eq!(report.meta.version, REPORT_VERSION);
        assert_eq!(report.meta.num_features, 1);
        assert!(!report.meta.created_at.is_empty());
        assert_eq!(report.features["logging"].common_files.len(), 1);
    }

    #[test]
    fn malformed_traces_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("traces.json");
        std::fs::write(&path, "[1, 2]").unwrap();
        let err = load_traces(&path).unwrap_err();
        assert!(format!("{err:#}").contains("traces.json"));
    }
}
