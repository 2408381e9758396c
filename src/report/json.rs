//! JSON reporter for machine consumption

use crate::analysis::Finding;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'static str,
    total: usize,
    findings: Vec<JsonFinding<'a>>,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    code: &'static str,
    #[serde(flatten)]
    finding: &'a Finding,
}

/// Writes findings as pretty-printed JSON to a file or stdout
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn render(findings: &[Finding]) -> Result<String> {
        let report = JsonReport {
            version: env!("CARGO_PKG_VERSION"),
            total: findings.len(),
            findings: findings
                .iter()
                .map(|finding| JsonFinding {
                    code: finding.issue.code(),
                    finding,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&report).map_err(Error::Json)
    }

    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        let json = Self::render(findings)?;
        match &self.output_path {
            Some(path) => std::fs::write(path, json).map_err(|e| Error::io(path, e)),
            None => {
                println!("{}", json);
                Ok(())
            }
        }
    }
}
