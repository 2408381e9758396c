use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read {path}")]
    #[diagnostic(code(searchunused::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration in {path}")]
    #[diagnostic(
        code(searchunused::config),
        help("see searchunused.toml in the README for the supported keys")
    )]
    ConfigToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid YAML configuration in {path}")]
    #[diagnostic(code(searchunused::config))]
    ConfigYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid exempt name pattern '{pattern}'")]
    #[diagnostic(code(searchunused::config))]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid exclude pattern '{pattern}'")]
    #[diagnostic(code(searchunused::config))]
    Glob {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to walk {path}")]
    #[diagnostic(code(searchunused::discovery))]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },

    #[error("failed to load the Java grammar: {0}")]
    #[diagnostic(code(searchunused::parser))]
    Language(String),

    #[error("syntax error at line {line}, column {column}")]
    #[diagnostic(
        code(searchunused::syntax),
        help("files that do not compile are skipped; fix the syntax error first")
    )]
    Syntax { line: usize, column: usize },

    #[error("parser produced no tree")]
    #[diagnostic(code(searchunused::parser))]
    NoTree,

    #[error("failed to serialize the report")]
    #[diagnostic(code(searchunused::report))]
    Json(#[source] serde_json::Error),

    #[error("prompt failed")]
    #[diagnostic(code(searchunused::refactor))]
    Prompt(#[source] dialoguer::Error),

    #[error("overlapping edits at byte {offset}")]
    #[diagnostic(code(searchunused::fix))]
    OverlappingEdits { offset: usize },

    #[error("edit {start}..{end} is outside the source text")]
    #[diagnostic(code(searchunused::fix))]
    EditOutOfBounds { start: usize, end: usize },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
