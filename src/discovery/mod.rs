//! Source file discovery
//!
//! Walks the analysed directory (or the configured targets below it) for
//! `.java` files, honouring `.gitignore`/`.ignore` files and the configured
//! exclude globs.

use crate::config::Config;
use crate::error::{Error, Result};
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::debug;

const JAVA_EXTENSION: &str = "java";

/// Finds Java source files to analyse
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// All Java files under `root`, sorted by path
    pub fn find_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if root.is_file() {
            return Ok(if is_java(root) {
                vec![root.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        let roots: Vec<PathBuf> = if self.config.targets.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.config.targets.iter().map(|t| root.join(t)).collect()
        };

        let mut files = Vec::new();
        for dir in roots {
            if !dir.exists() {
                debug!("Skipping missing target {}", dir.display());
                continue;
            }
            let overrides = self.build_overrides(&dir)?;
            let walker = WalkBuilder::new(&dir)
                .hidden(true)
                .git_ignore(true)
                .overrides(overrides)
                .build();

            for entry in walker {
                let entry = entry.map_err(|source| Error::Walk {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file()) && is_java(path) {
                    files.push(path.to_path_buf());
                }
            }
        }

        files.sort();
        files.dedup();
        debug!("Discovered {} Java files", files.len());
        Ok(files)
    }

    fn build_overrides(&self, dir: &Path) -> Result<Override> {
        let mut builder = OverrideBuilder::new(dir);
        for pattern in &self.config.exclude {
            builder
                .add(&format!("!{}", pattern))
                .map_err(|source| Error::Glob {
                    pattern: pattern.clone(),
                    source,
                })?;
        }
        builder.build().map_err(|source| Error::Glob {
            pattern: self.config.exclude.join(", "),
            source,
        })
    }
}

fn is_java(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(JAVA_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src/main/java/com/example");
        let generated = dir.path().join("build/generated");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&generated).unwrap();
        fs::write(src.join("App.java"), "class App {}").unwrap();
        fs::write(src.join("notes.txt"), "not java").unwrap();
        fs::write(generated.join("Gen.java"), "class Gen {}").unwrap();
        dir
    }

    #[test]
    fn test_finds_only_java_files() {
        let dir = create_tree();
        let config = Config::default();
        let files = FileFinder::new(&config).find_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.extension().unwrap() == "java"));
    }

    #[test]
    fn test_exclude_patterns() {
        let dir = create_tree();
        let config = Config {
            exclude: vec!["build/**".to_string()],
            ..Default::default()
        };
        let files = FileFinder::new(&config).find_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("App.java"));
    }

    #[test]
    fn test_targets_restrict_walk() {
        let dir = create_tree();
        let config = Config {
            targets: vec![PathBuf::from("build")],
            ..Default::default()
        };
        let files = FileFinder::new(&config).find_files(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Gen.java"));
    }

    #[test]
    fn test_single_file_root() {
        let dir = create_tree();
        let file = dir.path().join("src/main/java/com/example/App.java");
        let config = Config::default();
        let files = FileFinder::new(&config).find_files(&file).unwrap();
        assert_eq!(files, vec![file]);
    }
}
