//! Name transforms between asset filenames and emitted identifiers.

/// Convert a kebab-case asset name into a PascalCase identifier.
///
/// Splits on `-`, uppercases the first character of each segment and joins the
/// segments without a separator. The rest of each segment is kept as written.
pub fn kebab_to_pascal(name: &str) -> String {
    name.split('-').map(capitalize).collect()
}

/// Convert a kebab-case name into a camelCase identifier.
pub fn kebab_to_camel(name: &str) -> String {
    let mut segments = name.split('-');
    let mut out = segments.next().unwrap_or_default().to_string();
    out.extend(segments.map(capitalize));
    out
}

/// Whether `ident` can be emitted as an ECMAScript binding name.
///
/// Restricted to the ASCII subset used by generated modules.
pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_ascii_alphabetic() || first == '_' || first == '$') {
        return false;
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
        && !RESERVED_WORDS.contains(&ident)
}

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "import", "in", "instanceof", "let", "new", "null", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
