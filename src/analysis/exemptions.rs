//! Exemption predicates
//!
//! Small pure predicates deciding whether a declaration is a candidate at
//! all, and whether it is exempted from the primary finding. They look only
//! at the declaration's syntax (modifiers, annotations, declared type) and
//! the compiled [`AnalysisOptions`].

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::syntax::{Annotation, MethodDecl, Modifier, Modifiers, TypeDecl, TypeRef};
use regex::Regex;

/// Values accepted by `@SuppressWarnings` to silence this analysis
const SUPPRESSION_NAMES: &[&str] = &["unused", "UnusedVariable", "StrictUnusedVariable"];

/// Annotations marking a field as set by a dependency injection framework
const INJECTION_ANNOTATIONS: &[&str] = &[
    "javax.inject.Inject",
    "jakarta.inject.Inject",
    "com.google.inject.Inject",
    "org.springframework.beans.factory.annotation.Autowired",
];

/// Fields read through reflection by the serialization machinery
const SERIAL_VERSION_UID: &str = "serialVersionUID";

/// [`AnalysisConfig`] with its patterns compiled
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub unused_name_prefix: String,
    pub exempt_name_patterns: Vec<Regex>,
    pub method_annotations_exempting_parameters: Vec<String>,
    pub report_injected_fields: bool,
    pub check_non_private_parameters: bool,
    pub exempting_variable_annotations: Vec<String>,
    pub exempting_field_types: Vec<String>,
    pub exempting_class_supertypes: Vec<String>,
}

impl AnalysisOptions {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self> {
        let exempt_name_patterns = config
            .exempt_name_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| Error::Pattern {
                    pattern: pattern.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            unused_name_prefix: config.unused_name_prefix.clone(),
            exempt_name_patterns,
            method_annotations_exempting_parameters: config
                .method_annotations_exempting_parameters
                .clone(),
            report_injected_fields: config.report_injected_fields,
            check_non_private_parameters: config.check_non_private_parameters,
            exempting_variable_annotations: config.exempting_variable_annotations.clone(),
            exempting_field_types: config.exempting_field_types.clone(),
            exempting_class_supertypes: config.exempting_class_supertypes.clone(),
        })
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        let config = AnalysisConfig::default();
        Self {
            unused_name_prefix: config.unused_name_prefix,
            exempt_name_patterns: Vec::new(),
            method_annotations_exempting_parameters: config.method_annotations_exempting_parameters,
            report_injected_fields: config.report_injected_fields,
            check_non_private_parameters: config.check_non_private_parameters,
            exempting_variable_annotations: config.exempting_variable_annotations,
            exempting_field_types: config.exempting_field_types,
            exempting_class_supertypes: config.exempting_class_supertypes,
        }
    }
}

fn suppresses(annotation: &Annotation) -> bool {
    if !annotation.matches("java.lang.SuppressWarnings") {
        return false;
    }
    let Some(arguments) = &annotation.arguments else {
        return false;
    };
    string_literals(arguments).any(|value| SUPPRESSION_NAMES.contains(&value))
}

/// The contents of every `"..."` literal in annotation argument text
fn string_literals(text: &str) -> impl Iterator<Item = &str> {
    text.split('"').skip(1).step_by(2)
}

/// `@SuppressWarnings("unused")` and friends
pub fn is_suppressed(modifiers: &Modifiers) -> bool {
    modifiers.annotations.iter().any(suppresses)
}

/// Name marks the declaration as intentionally unused
pub fn is_exempt_by_name(name: &str, options: &AnalysisOptions) -> bool {
    let prefix = &options.unused_name_prefix;
    (!prefix.is_empty() && name.starts_with(prefix.as_str()))
        || options.exempt_name_patterns.iter().any(|re| re.is_match(name))
}

pub fn has_exempting_annotation(modifiers: &Modifiers, options: &AnalysisOptions) -> bool {
    options
        .exempting_variable_annotations
        .iter()
        .any(|name| modifiers.has_annotation(name))
}

pub fn is_injected(modifiers: &Modifiers) -> bool {
    INJECTION_ANNOTATIONS
        .iter()
        .any(|name| modifiers.has_annotation(name))
}

pub fn has_exempting_type(ty: &TypeRef, options: &AnalysisOptions) -> bool {
    options.exempting_field_types.iter().any(|name| ty.matches(name))
}

pub fn is_serial_version_uid(name: &str) -> bool {
    name == SERIAL_VERSION_UID
}

/// Fields of this type are never reported
pub fn class_exempts_fields(decl: &TypeDecl, options: &AnalysisOptions) -> bool {
    decl.supertypes.iter().any(|supertype| {
        options
            .exempting_class_supertypes
            .iter()
            .any(|name| supertype.matches(name))
    })
}

/// Parameters of this method are never reported
///
/// Overriding methods cannot drop parameters, and framework callbacks are
/// invoked reflectively with a fixed signature.
pub fn method_exempts_params(method: &MethodDecl, options: &AnalysisOptions) -> bool {
    method.modifiers.has_annotation("java.lang.Override")
        || options
            .method_annotations_exempting_parameters
            .iter()
            .any(|name| method.modifiers.has_annotation(name))
        || is_main_method(method)
}

fn is_main_method(method: &MethodDecl) -> bool {
    method.name.name == "main"
        && method.modifiers.has(Modifier::Public)
        && method.modifiers.has(Modifier::Static)
        && method.params.len() == 1
}
