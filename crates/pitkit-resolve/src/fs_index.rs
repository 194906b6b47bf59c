use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use regex::Regex;
use walkdir::WalkDir;

use crate::syntax::{DeclaredType, SearchScope, SyntaxIndex, SyntaxNode};

const SOURCE_EXTENSIONS: [&str; 2] = ["java", "kt"];

#[derive(Debug, Default)]
struct ParsedSource {
    types: Vec<DeclaredType>,
}

/// Syntax index over files on disk.
///
/// Declarations are extracted with regular expressions after blanking out
/// comments and string literals; only the `package` header and top-level
/// type names are recognized. Parsed files are cached for the lifetime of
/// the index, so one instance should serve one request.
#[derive(Debug, Default)]
pub struct FsSyntaxIndex {
    source_roots: Vec<PathBuf>,
    parsed: RwLock<HashMap<PathBuf, Arc<ParsedSource>>>,
}

impl FsSyntaxIndex {
    /// `source_roots` anchor package names for directories.
    pub fn new(source_roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            source_roots: source_roots.into_iter().collect(),
            parsed: RwLock::new(HashMap::new()),
        }
    }

    fn parse(&self, path: &Path) -> Arc<ParsedSource> {
        if let Some(parsed) = self.parsed.read().get(path) {
            return Arc::clone(parsed);
        }

        let parsed = match std::fs::read_to_string(path) {
            Ok(text) => Arc::new(ParsedSource {
                types: declared_types(path, &text),
            }),
            Err(err) => {
                tracing::debug!(
                    target: "pitkit.resolve",
                    path = %path.display(),
                    error = %err,
                    "failed to read source file"
                );
                Arc::new(ParsedSource::default())
            }
        };

        Arc::clone(
            self.parsed
                .write()
                .entry(path.to_path_buf())
                .or_insert(parsed),
        )
    }

    fn source_root_of(&self, path: &Path) -> Option<&Path> {
        self.source_roots
            .iter()
            .filter(|root| path.starts_with(root))
            .max_by_key(|root| root.components().count())
            .map(PathBuf::as_path)
    }
}

impl SyntaxIndex for FsSyntaxIndex {
    fn node_at(&self, path: &Path) -> Option<SyntaxNode> {
        let meta = std::fs::metadata(path).ok()?;
        if meta.is_dir() {
            Some(SyntaxNode::directory(path))
        } else if meta.is_file() {
            Some(SyntaxNode::file(path))
        } else {
            None
        }
    }

    fn children(&self, dir: &SyntaxNode) -> Vec<SyntaxNode> {
        let Ok(entries) = std::fs::read_dir(&dir.path) else {
            return Vec::new();
        };
        let mut children: Vec<SyntaxNode> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| self.node_at(&entry.path()))
            .collect();
        children.sort_by(|a, b| a.path.cmp(&b.path));
        children
    }

    fn top_level_types(&self, file: &SyntaxNode) -> Vec<DeclaredType> {
        if file.is_dir() || !is_source_file(&file.path) {
            return Vec::new();
        }
        self.parse(&file.path).types.clone()
    }

    fn package_of(&self, dir: &SyntaxNode) -> Option<String> {
        if !dir.is_dir() {
            return None;
        }
        let root = self.source_root_of(&dir.path)?;
        let relative = dir.path.strip_prefix(root).ok()?;

        let mut segments = Vec::new();
        for component in relative.components() {
            let segment = component.as_os_str().to_str()?;
            if !identifier_re().is_match(segment) {
                return None;
            }
            segments.push(segment);
        }
        Some(segments.join("."))
    }

    fn find_classes_by_name(&self, simple_name: &str, scope: &SearchScope) -> Vec<DeclaredType> {
        let mut found = Vec::new();
        for root in scope.roots() {
            let files = WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file() && is_source_file(entry.path()));
            for entry in files {
                let parsed = self.parse(entry.path());
                found.extend(
                    parsed
                        .types
                        .iter()
                        .filter(|ty| ty.simple_name == simple_name)
                        .cloned(),
                );
            }
        }
        found
    }
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("valid identifier regex"))
}

fn package_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*package\s+([A-Za-z_$][\w$]*(?:\s*\.\s*[A-Za-z_$][\w$]*)*)")
            .expect("valid package regex")
    })
}

fn type_decl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?m)(?:^|[^:.\w$])(?P<mods>(?:\b(?:public|protected|private|internal|abstract|final|sealed|non-sealed|open|static|strictfp|data|enum|annotation|inner|value)\s+)*)(?P<kind>@interface|\bclass|\binterface|\benum|\brecord|\bobject)\s+(?P<name>[A-Za-z_$][\w$]*)",
        )
        .expect("valid type declaration regex")
    })
}

/// Words that can follow `class`/`object` without naming a declaration, as in
/// `String::class\nfun main()` or `companion object {`.
const NOT_A_TYPE_NAME: &[&str] = &[
    "fun", "val", "var", "object", "class", "interface", "enum", "companion", "constructor",
    "init", "extends", "implements", "where", "return", "if", "when", "import", "package",
];

/// Top-level types declared in `text`, in source order.
fn declared_types(path: &Path, text: &str) -> Vec<DeclaredType> {
    let code = blank_comments_and_literals(text);
    let package = package_re()
        .captures(&code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<String>())
        .unwrap_or_default();
    let is_kotlin = path.extension().and_then(|ext| ext.to_str()) == Some("kt");

    let mut types = Vec::new();
    let mut depth: i64 = 0;
    let mut scanned = 0;
    for caps in type_decl_re().captures_iter(&code) {
        let (Some(mods), Some(name)) = (caps.name("mods"), caps.name("name")) else {
            continue;
        };
        depth += brace_delta(&code[scanned..mods.start()]);
        scanned = mods.start();
        if depth != 0 || NOT_A_TYPE_NAME.contains(&name.as_str()) {
            continue;
        }

        let mods: Vec<&str> = mods.as_str().split_whitespace().collect();
        let is_public = if is_kotlin {
            !mods
                .iter()
                .any(|m| matches!(*m, "private" | "internal" | "protected"))
        } else {
            mods.contains(&"public")
        };

        let simple_name = name.as_str().to_string();
        let qualified_name = if package.is_empty() {
            simple_name.clone()
        } else {
            format!("{package}.{simple_name}")
        };
        types.push(DeclaredType {
            qualified_name,
            simple_name,
            is_public,
            path: path.to_path_buf(),
        });
    }
    types
}

fn brace_delta(code: &str) -> i64 {
    code.chars().fold(0, |delta, ch| match ch {
        '{' => delta + 1,
        '}' => delta - 1,
        _ => delta,
    })
}

/// Replaces comments and string/char literal bodies with spaces.
///
/// Newlines are kept so `(?m)` anchors still line up.
fn blank_comments_and_literals(text: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        LineComment,
        BlockComment,
        Str,
        TextBlock,
        Char,
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut i = 0;

    let blank = |ch: char| if ch == '\n' { '\n' } else { ' ' };

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();
        let triple = ch == '"' && next == Some('"') && chars.get(i + 2) == Some(&'"');

        match state {
            State::Code => match (ch, next) {
                ('/', Some('/')) => {
                    state = State::LineComment;
                    out.push_str("  ");
                    i += 2;
                    continue;
                }
                ('/', Some('*')) => {
                    state = State::BlockComment;
                    out.push_str("  ");
                    i += 2;
                    continue;
                }
                ('"', _) if triple => {
                    state = State::TextBlock;
                    out.push_str("   ");
                    i += 3;
                    continue;
                }
                ('"', _) => {
                    state = State::Str;
                    out.push(' ');
                }
                ('\'', _) => {
                    state = State::Char;
                    out.push(' ');
                }
                _ => out.push(ch),
            },
            State::LineComment => {
                if ch == '\n' {
                    state = State::Code;
                }
                out.push(blank(ch));
            }
            State::BlockComment => {
                if ch == '*' && next == Some('/') {
                    state = State::Code;
                    out.push_str("  ");
                    i += 2;
                    continue;
                }
                out.push(blank(ch));
            }
            State::TextBlock => {
                if triple {
                    state = State::Code;
                    out.push_str("   ");
                    i += 3;
                    continue;
                }
                out.push(blank(ch));
            }
            State::Str | State::Char => {
                let closing = if state == State::Str { '"' } else { '\'' };
                if ch == '\\' {
                    out.push(' ');
                    if let Some(escaped) = next {
                        out.push(blank(escaped));
                    }
                    i += 2;
                    continue;
                }
                if ch == closing || ch == '\n' {
                    state = State::Code;
                }
                out.push(blank(ch));
            }
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(types: &[DeclaredType]) -> Vec<(&str, bool)> {
        types
            .iter()
            .map(|ty| (ty.qualified_name.as_str(), ty.is_public))
            .collect()
    }

    #[test]
    fn extracts_package_and_top_level_java_types_only() {
        let src = r#"
// class Commented {}
package com.acme.util;

import java.util.List;

/* public class Hidden {} */
class Helper {
    static class Nested {}
    String s = "class Fake {}";
}

public final class Util {
    interface Inner {}
}

enum Mode { A, B }
"#;
        let types = declared_types(Path::new("Util.java"), src);
        assert_eq!(
            names(&types),
            vec![
                ("com.acme.util.Helper", false),
                ("com.acme.util.Util", true),
                ("com.acme.util.Mode", false),
            ]
        );
    }

    #[test]
    fn kotlin_declarations_are_public_by_default() {
        let src = r#"
package com.example.lib

private class Cache
data class Point(val x: Int, val y: Int)
object Registry {
    class Entry
}
internal enum class Color { RED }
"#;
        let types = declared_types(Path::new("Shapes.kt"), src);
        assert_eq!(
            names(&types),
            vec![
                ("com.example.lib.Cache", false),
                ("com.example.lib.Point", true),
                ("com.example.lib.Registry", true),
                ("com.example.lib.Color", false),
            ]
        );
    }

    #[test]
    fn class_literals_are_not_declarations() {
        let kotlin = "package a\n\nval kind = String::class\nfun main() {}\n\nclass Real\n";
        let types = declared_types(Path::new("Real.kt"), kotlin);
        assert_eq!(names(&types), vec![("a.Real", true)]);

        let chained = "package b\n\nval kinds = listOf(A::class, B::class)\nval last = C::class\nobject Holder\n";
        let types = declared_types(Path::new("Holder.kt"), chained);
        assert_eq!(names(&types), vec![("b.Holder", true)]);
    }

    #[test]
    fn default_package_and_records_and_annotations() {
        let src = "public record Pair(int a, int b) {}\n@interface Marker {}\n";
        let types = declared_types(Path::new("Pair.java"), src);
        assert_eq!(names(&types), vec![("Pair", true), ("Marker", false)]);
    }

    #[test]
    fn text_blocks_and_char_literals_are_ignored() {
        let src = "package p;\nclass A {\n  String t = \"\"\"\n  }\n  class X {}\n  \"\"\";\n  char c = '{';\n}\nclass B {}\n";
        let types = declared_types(Path::new("A.java"), src);
        assert_eq!(names(&types), vec![("p.A", false), ("p.B", false)]);
    }

    #[test]
    fn package_of_requires_a_source_root_and_identifiers() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("src/main/java");
        std::fs::create_dir_all(root.join("com/acme")).unwrap();
        std::fs::create_dir_all(root.join("not-a-package")).unwrap();

        let index = FsSyntaxIndex::new([root.clone()]);
        let node = index.node_at(&root.join("com/acme")).unwrap();
        assert_eq!(index.package_of(&node).as_deref(), Some("com.acme"));

        let bad = index.node_at(&root.join("not-a-package")).unwrap();
        assert_eq!(index.package_of(&bad), None);

        let outside = index.node_at(tmp.path()).unwrap();
        assert_eq!(index.package_of(&outside), None);
    }

    #[test]
    fn finds_classes_by_simple_name_within_scope() {
        let tmp = tempfile::tempdir().unwrap();
        let test_root = tmp.path().join("src/test/java");
        let main_root = tmp.path().join("src/main/java");
        for (root, package) in [
            (&test_root, "com/myproject/package1"),
            (&test_root, "com/myproject/package9"),
            (&main_root, "com/myproject/package1"),
        ] {
            let dir = root.join(package);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(
                dir.join("ClassATest.java"),
                format!("package {};\npublic class ClassATest {{}}\n", package.replace('/', ".")),
            )
            .unwrap();
        }

        let index = FsSyntaxIndex::new([main_root, test_root.clone()]);
        let found = index.find_classes_by_name("ClassATest", &SearchScope::new([test_root]));
        assert_eq!(
            found
                .iter()
                .map(|ty| ty.qualified_name.as_str())
                .collect::<Vec<_>>(),
            vec![
                "com.myproject.package1.ClassATest",
                "com.myproject.package9.ClassATest"
            ]
        );
    }
}
