//! Stylesheet import inlining for shadow-encapsulated components.
//!
//! A shadow stylesheet composes shared CSS through `@import "<relative-path>";`
//! statements. Shadow roots cannot follow those imports at runtime, so each
//! statement is replaced in place by the fully resolved text of its target,
//! depth-first and left to right. Rule order in the output is exactly the order
//! a top-to-bottom textual substitution produces.

use crate::error::{CodegenError, CodegenResult};
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Resolve `root` and every stylesheet it imports into one self-contained string.
///
/// Fails when the root or any import target is missing, when a stylesheet
/// re-enters the active import chain, and when an `@import` form other than the
/// quoted relative path is present.
pub fn resolve_stylesheet(root: &Path) -> CodegenResult<String> {
    if !root.is_file() {
        return Err(CodegenError::StylesheetMissing {
            path: root.to_path_buf(),
        });
    }
    let mut chain = ImportChain::default();
    resolve_file(root, &mut chain)
}

/// Files currently being resolved, outermost first.
#[derive(Default)]
struct ImportChain {
    canonical: Vec<PathBuf>,
    display: Vec<PathBuf>,
}

impl ImportChain {
    fn enter(&mut self, path: &Path) -> CodegenResult<()> {
        let canonical = fs::canonicalize(path).map_err(|source| CodegenError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(start) = self.canonical.iter().position(|seen| *seen == canonical) {
            let mut chain = self.display[start..].to_vec();
            chain.push(path.to_path_buf());
            return Err(CodegenError::CircularImport { chain });
        }
        self.canonical.push(canonical);
        self.display.push(path.to_path_buf());
        Ok(())
    }

    fn leave(&mut self) {
        self.canonical.pop();
        self.display.pop();
    }
}

fn resolve_file(path: &Path, chain: &mut ImportChain) -> CodegenResult<String> {
    chain.enter(path)?;
    let text = fs::read_to_string(path).map_err(|source| CodegenError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let resolved = inline_imports(path, &text, chain);
    chain.leave();
    resolved
}

fn inline_imports(path: &Path, text: &str, chain: &mut ImportChain) -> CodegenResult<String> {
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let comments = comment_spans(text);

    for caps in import_statement().captures_iter(text) {
        let Some(statement) = caps.get(0) else {
            continue;
        };
        if in_comment(&comments, statement.start()) {
            continue;
        }
        let specifier = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or_default();

        reject_unsupported_imports(path, text, &comments, cursor, statement.start())?;
        out.push_str(&text[cursor..statement.start()]);

        let target = base.join(specifier);
        if !target.is_file() {
            return Err(CodegenError::MissingImport {
                specifier: specifier.to_string(),
                importer: path.to_path_buf(),
                resolved: target,
            });
        }
        out.push_str(&resolve_file(&target, chain)?);
        cursor = statement.end();
    }

    reject_unsupported_imports(path, text, &comments, cursor, text.len())?;
    out.push_str(&text[cursor..]);
    Ok(out)
}

fn reject_unsupported_imports(
    path: &Path,
    text: &str,
    comments: &[Range<usize>],
    start: usize,
    end: usize,
) -> CodegenResult<()> {
    let Some(found) = any_import()
        .find_iter(&text[start..end])
        .find(|found| !in_comment(comments, start + found.start()))
    else {
        return Ok(());
    };
    let offset = start + found.start();
    let rest = &text[offset..];
    let statement_end = rest
        .find(|ch: char| ch == ';' || ch == '\n')
        .map(|idx| if rest[idx..].starts_with(';') { idx + 1 } else { idx })
        .unwrap_or(rest.len());
    Err(CodegenError::UnsupportedImport {
        path: path.to_path_buf(),
        line: line_number(text, offset),
        statement: rest[..statement_end].trim().to_string(),
    })
}

/// Byte ranges of `/* ... */` comments; an unterminated comment runs to the end.
fn comment_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut from = 0usize;
    while let Some(open) = text[from..].find("/*") {
        let start = from + open;
        let end = text[start + 2..]
            .find("*/")
            .map(|close| start + 2 + close + 2)
            .unwrap_or(text.len());
        spans.push(start..end);
        from = end;
    }
    spans
}

fn in_comment(comments: &[Range<usize>], offset: usize) -> bool {
    comments.iter().any(|span| span.contains(&offset))
}

fn line_number(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn import_statement() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"@import\s*(?:"([^"\n]*)"|'([^'\n]*)')\s*;"#).expect("valid @import regex")
    })
}

fn any_import() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@import\b").expect("valid @import regex"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("{prefix}_{}_{}", process::id(), nanos));
        fs::create_dir_all(&path).expect("create temp dir");
        path
    }

    fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("parent")).expect("create parent");
        fs::write(&path, body).expect("write css");
        path
    }

    #[test]
    fn nested_imports_are_substituted_in_place() {
        let root = temp_dir("css_nested");
        write(&root, "shared/b.css", ".b { color: red; }\n");
        write(&root, "shared/a.css", ".a-before {}\n@import \"./b.css\";\n.a-after {}\n");
        let entry = write(
            &root,
            "button/button.shadow.css",
            ":host { display: inline-flex; }\n@import '../shared/a.css';\n.btn {}\n",
        );

        let resolved = resolve_stylesheet(&entry).expect("resolve");
        assert_eq!(
            resolved,
            ":host { display: inline-flex; }\n.a-before {}\n.b { color: red; }\n\n.a-after {}\n\n.btn {}\n"
        );
        assert!(!resolved.contains("@import"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn sibling_imports_keep_statement_order() {
        let root = temp_dir("css_order");
        write(&root, "one.css", "/*one*/");
        write(&root, "two.css", "/*two*/");
        let entry = write(&root, "entry.css", "@import \"two.css\";@import \"one.css\";");

        assert_eq!(
            resolve_stylesheet(&entry).expect("resolve"),
            "/*two*//*one*/"
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_import_names_the_unresolved_path() {
        let root = temp_dir("css_missing");
        let entry = write(&root, "entry.css", "@import \"./tokens/missing.css\";\n");

        let err = resolve_stylesheet(&entry).expect_err("missing import should fail");
        match &err {
            CodegenError::MissingImport {
                specifier,
                resolved,
                ..
            } => {
                assert_eq!(specifier, "./tokens/missing.css");
                assert_eq!(resolved, &root.join("./tokens/missing.css"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("./tokens/missing.css"));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn missing_root_is_reported() {
        let root = temp_dir("css_missing_root");
        let err = resolve_stylesheet(&root.join("absent.css")).expect_err("missing root");
        assert!(matches!(err, CodegenError::StylesheetMissing { .. }));
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn self_import_is_a_cycle() {
        let root = temp_dir("css_self_cycle");
        let entry = write(&root, "loop.css", ".x {}\n@import \"loop.css\";\n");

        let err = resolve_stylesheet(&entry).expect_err("cycle should fail");
        let CodegenError::CircularImport { chain } = err else {
            panic!("expected circular import");
        };
        assert_eq!(chain.len(), 2);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn mutual_imports_report_the_chain() {
        let root = temp_dir("css_mutual_cycle");
        write(&root, "a.css", "@import \"b.css\";");
        write(&root, "b.css", "@import \"a.css\";");
        let entry = write(&root, "entry.css", "@import \"a.css\";");

        let err = resolve_stylesheet(&entry).expect_err("cycle should fail");
        let message = err.to_string();
        assert!(message.starts_with("circular @import:"), "{message}");
        assert!(message.contains("a.css -> "), "{message}");
        assert!(message.ends_with("a.css"), "{message}");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn diamond_imports_are_inlined_at_each_site() {
        let root = temp_dir("css_diamond");
        write(&root, "base.css", "B");
        write(&root, "left.css", "L@import \"base.css\";");
        write(&root, "right.css", "R@import \"base.css\";");
        let entry = write(&root, "entry.css", "@import \"left.css\";@import \"right.css\";");

        assert_eq!(resolve_stylesheet(&entry).expect("resolve"), "LBRB");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn url_imports_are_rejected_with_location() {
        let root = temp_dir("css_url_import");
        let entry = write(
            &root,
            "entry.css",
            ".a {}\n@import url(\"fonts.css\") screen;\n",
        );

        let err = resolve_stylesheet(&entry).expect_err("url import should fail");
        let CodegenError::UnsupportedImport {
            line, statement, ..
        } = err else {
            panic!("expected unsupported import");
        };
        assert_eq!(line, 2);
        assert_eq!(statement, "@import url(\"fonts.css\") screen;");

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn commented_out_imports_are_left_alone() {
        let root = temp_dir("css_commented_import");
        write(&root, "old.css", ".old {} /* closes */\n");
        let entry = write(
            &root,
            "entry.css",
            "/* @import url(\"legacy.css\"); */\n/* @import \"old.css\"; */\n/*\n  @import \"gone.css\";\n*/\n.a {}\n",
        );

        assert_eq!(
            resolve_stylesheet(&entry).expect("resolve"),
            "/* @import url(\"legacy.css\"); */\n/* @import \"old.css\"; */\n/*\n  @import \"gone.css\";\n*/\n.a {}\n"
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn imports_after_a_comment_still_resolve() {
        let root = temp_dir("css_import_after_comment");
        write(&root, "tokens.css", ":host { --x: 1; }");
        let entry = write(
            &root,
            "entry.css",
            "/* shared tokens */ @import \"tokens.css\";\n@import url(\"x.css\");",
        );

        let err = resolve_stylesheet(&entry).expect_err("live url import still fails");
        assert!(matches!(err, CodegenError::UnsupportedImport { line: 2, .. }));

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn comment_spans_cover_unterminated_comments() {
        assert_eq!(comment_spans("a/*b*/c/*d"), vec![1..6, 7..10]);
        assert!(in_comment(&comment_spans("x /* @import */"), 5));
        assert!(!in_comment(&comment_spans("/**/ @import"), 5));
    }
}
