//! Naming and quoting helpers shared by synthesis and emission.

use std::collections::HashSet;
use std::sync::LazyLock;

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "break",
        "case",
        "catch",
        "class",
        "const",
        "continue",
        "debugger",
        "default",
        "delete",
        "do",
        "else",
        "enum",
        "export",
        "extends",
        "false",
        "finally",
        "for",
        "function",
        "if",
        "import",
        "in",
        "instanceof",
        "new",
        "null",
        "return",
        "super",
        "switch",
        "this",
        "throw",
        "true",
        "try",
        "typeof",
        "var",
        "void",
        "while",
        "with",
        "yield",
        "let",
        "static",
        "implements",
        "interface",
        "package",
        "private",
        "protected",
        "public",
        "await",
        "async",
    ]
    .into_iter()
    .collect()
});

/// Check if a property name needs quoting to be used as an object key.
pub fn needs_bracket_notation(name: &str) -> bool {
    name.is_empty()
        || !name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a double-quoted JavaScript string literal.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if it is not a plain identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_bracket_notation(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Turn an arbitrary name into a camelCase TypeScript identifier.
///
/// `-`, `.` and spaces act as word separators; a leading digit gets a `_`
/// prefix and reserved words are escaped with `_`.
pub fn sanitize_ts_identifier(name: &str) -> String {
    let mut result = String::new();
    for (i, part) in name.split(['-', '.', ' ']).enumerate() {
        if i == 0 {
            result.push_str(part);
        } else {
            result.push_str(&capitalize_first(part));
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if TS_RESERVED_WORDS.contains(result.as_str()) {
        result.insert(0, '_');
    }
    result
}

/// Turn a component key into a PascalCase type name.
pub fn pascal_identifier(key: &str) -> String {
    let mut result: String = key.split(['-', '.', ' ']).map(capitalize_first).collect();
    if result.is_empty() {
        return "_Empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

/// Capitalize the first letter of a string.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first letter of a string.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Convert a string to snake_case (for comparison purposes).
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else if c == '-' {
            result.push('_');
        } else {
            result.push(c);
        }
    }
    result
}

/// Format text lines as a `/** ... */` documentation block.
///
/// Blank entries are skipped; returns `None` when nothing remains.
pub fn doc_block<'a>(lines: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let mut body: Vec<String> = lines
        .into_iter()
        .flat_map(str::lines)
        .map(str::trim_end)
        .skip_while(|line| line.trim().is_empty())
        .map(|line| {
            let line = line.replace("*/", "*\\/");
            if line.is_empty() {
                " *".to_string()
            } else {
                format!(" * {line}")
            }
        })
        .collect();

    while body.last().is_some_and(|line| line == " *") {
        body.pop();
    }
    if body.is_empty() {
        return None;
    }
    Some(format!("/**\n{}\n */", body.join("\n")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_bracket_notation() {
        assert!(!needs_bracket_notation("foo"));
        assert!(!needs_bracket_notation("_foo"));
        assert!(!needs_bracket_notation("$foo"));
        assert!(!needs_bracket_notation("foo123"));

        assert!(needs_bracket_notation(""));
        assert!(needs_bracket_notation("123foo"));
        assert!(needs_bracket_notation("foo-bar"));
        assert!(needs_bracket_notation("foo bar"));
    }

    #[test]
    fn test_quote_if_needed() {
        assert_eq!(quote_if_needed("foo"), "foo");
        assert_eq!(quote_if_needed("x-request-id"), "\"x-request-id\"");
        assert_eq!(quote_if_needed("say\"hi"), "\"say\\\"hi\"");
    }

    #[test]
    fn test_sanitize_ts_identifier() {
        assert_eq!(sanitize_ts_identifier("foo"), "foo");
        assert_eq!(sanitize_ts_identifier("use-case-id"), "useCaseId");
        assert_eq!(sanitize_ts_identifier("foo.bar"), "fooBar");
        assert_eq!(sanitize_ts_identifier("123foo"), "_123foo");
        assert_eq!(sanitize_ts_identifier("delete"), "_delete");
        assert_eq!(sanitize_ts_identifier(""), "_empty");
    }

    #[test]
    fn test_pascal_identifier() {
        assert_eq!(pascal_identifier("foo"), "Foo");
        assert_eq!(pascal_identifier("fooBar"), "FooBar");
        assert_eq!(pascal_identifier("use-case"), "UseCase");
        assert_eq!(pascal_identifier("snake_case"), "Snake_case");
        assert_eq!(pascal_identifier("2fa"), "_2fa");
    }

    #[test]
    fn test_case_helpers() {
        assert_eq!(capitalize_first("listPets"), "ListPets");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(lower_first("ListPets"), "listPets");
        assert_eq!(to_snake_case("itemId"), "item_id");
        assert_eq!(to_snake_case("item-id"), "item_id");
    }

    #[test]
    fn test_doc_block() {
        assert_eq!(doc_block(["A pet."]).unwrap(), "/**\n * A pet.\n */");
        assert_eq!(
            doc_block(["Lists pets.", "Paged.\n\nSee docs."]).unwrap(),
            "/**\n * Lists pets.\n * Paged.\n *\n * See docs.\n */"
        );
        assert_eq!(doc_block(["ends */ early"]).unwrap(), "/**\n * ends *\\/ early\n */");
        assert!(doc_block(["", "  "]).is_none());
        assert!(doc_block(Vec::<&str>::new()).is_none());
    }
}
