//! Configuration loading
//!
//! Configuration is read from `searchunused.toml`, `.searchunused.toml`,
//! `searchunused.yml` or `searchunused.yaml` in the analysed directory, or
//! from an explicit `--config` path. Every key is optional.
//!
//! ```toml
//! targets = ["src/main/java"]
//! exclude = ["**/generated/**"]
//!
//! [analysis]
//! unused_name_prefix = "_"
//! report_injected_fields = false
//! method_annotations_exempting_parameters = ["com.example.Callback"]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_FILE_NAMES: &[&str] = &[
    "searchunused.toml",
    ".searchunused.toml",
    "searchunused.yml",
    "searchunused.yaml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories to analyse, relative to the project root
    pub targets: Vec<PathBuf>,

    /// Glob patterns for files to skip
    pub exclude: Vec<String>,

    pub analysis: AnalysisConfig,
}

/// Options that change what the unused-declaration analysis reports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Names starting with this prefix are intentionally unused
    #[serde(alias = "unusedNamePrefix")]
    pub unused_name_prefix: String,

    /// Regular expressions for additional intentionally-unused names
    #[serde(alias = "exemptNamePatterns")]
    pub exempt_name_patterns: Vec<String>,

    /// Parameters of methods carrying one of these annotations are never reported
    #[serde(alias = "methodAnnotationsExemptingParameters")]
    pub method_annotations_exempting_parameters: Vec<String>,

    /// Report fields initialised by a dependency injection framework
    #[serde(alias = "reportInjectedFields")]
    pub report_injected_fields: bool,

    /// Report unused parameters of methods that are not private
    ///
    /// When off, such parameters are only checked for dead reassignments.
    #[serde(alias = "checkNonPrivateParameters")]
    pub check_non_private_parameters: bool,

    /// Annotations implying that a framework reads or writes the variable
    pub exempting_variable_annotations: Vec<String>,

    /// Declared types that are used for their construction side effects
    pub exempting_field_types: Vec<String>,

    /// Fields of classes extending one of these are never reported
    pub exempting_class_supertypes: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            unused_name_prefix: "_".to_string(),
            exempt_name_patterns: Vec::new(),
            method_annotations_exempting_parameters: vec![
                "org.robolectric.annotation.Implementation".to_string(),
            ],
            report_injected_fields: false,
            check_non_private_parameters: true,
            exempting_variable_annotations: to_strings(&[
                "javax.persistence.Basic",
                "javax.persistence.Column",
                "javax.persistence.Id",
                "javax.persistence.Version",
                "javax.xml.bind.annotation.XmlElement",
                "org.junit.Rule",
                "org.junit.ClassRule",
                "org.mockito.Mock",
                "org.mockito.Spy",
                "org.mockito.Captor",
                "org.openqa.selenium.support.FindBy",
                "org.openqa.selenium.support.FindBys",
            ]),
            exempting_field_types: to_strings(&[
                "org.junit.rules.TestRule",
                "org.junit.rules.MethodRule",
                "org.junit.rules.ExternalResource",
                "org.junit.rules.TemporaryFolder",
                "org.junit.rules.ExpectedException",
                "org.slf4j.Logger",
                "java.util.logging.Logger",
                "org.apache.logging.log4j.Logger",
            ]),
            exempting_class_supertypes: to_strings(&[
                "java.io.Serializable",
                "android.os.Parcelable",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Load configuration from a TOML or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yml") | Some("yaml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&content).map_err(|source| Error::ConfigYaml {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            toml::from_str(&content).map_err(|source| Error::ConfigToml {
                path: path.to_path_buf(),
                source,
            })?
        };

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Look for a configuration file in `root`, falling back to defaults
    pub fn from_default_locations(root: &Path) -> Result<Self> {
        let dir = if root.is_file() {
            root.parent().unwrap_or(root)
        } else {
            root
        };

        for name in DEFAULT_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                return Self::from_file(&candidate);
            }
        }

        Ok(Self::default())
    }
}
