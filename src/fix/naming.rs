//! Name transforms for renaming fixes
//!
//! `mark` turns a name into one the analysis treats as intentionally unused,
//! `unmark` reverses it for names that turned out to be used.

/// Fallback when nothing is left of a name after unmarking
const PLACEHOLDER: &str = "value";

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while", "var", "yield", "record",
];

/// `_` + `count` gives `_count`; `unused` + `count` gives `unusedCount`
pub fn mark(name: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return name.to_string();
    }
    let alphabetic = prefix.chars().last().is_some_and(|c| c.is_alphabetic());
    if alphabetic {
        format!("{}{}", prefix, upper_first(name))
    } else {
        format!("{}{}", prefix, name)
    }
}

/// Strip every leading `prefix` and re-case the rest as lower camel case
pub fn unmark(name: &str, prefix: &str) -> String {
    let mut rest = name;
    if !prefix.is_empty() {
        while let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }
    let rest = lower_first(rest);

    if rest.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if rest.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("{}{}", PLACEHOLDER, rest);
    }
    if JAVA_KEYWORDS.contains(&rest.as_str()) {
        return format!("{}{}", rest, upper_first(PLACEHOLDER));
    }
    rest
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_symbolic_prefix() {
        assert_eq!(mark("count", "_"), "_count");
    }

    #[test]
    fn test_mark_word_prefix() {
        assert_eq!(mark("count", "unused"), "unusedCount");
    }

    #[test]
    fn test_unmark() {
        assert_eq!(unmark("_count", "_"), "count");
        assert_eq!(unmark("__count", "_"), "count");
        assert_eq!(unmark("unusedCount", "unused"), "count");
        assert_eq!(unmark("_Count", "_"), "count");
    }

    #[test]
    fn test_unmark_fallbacks() {
        assert_eq!(unmark("_", "_"), "value");
        assert_eq!(unmark("_1", "_"), "value1");
        assert_eq!(unmark("_int", "_"), "intValue");
    }

    #[test]
    fn test_mark_then_unmark() {
        for prefix in ["_", "unused"] {
            assert_eq!(unmark(&mark("total", prefix), prefix), "total");
        }
    }
}
