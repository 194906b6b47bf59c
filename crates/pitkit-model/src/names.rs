//! Helpers for dot-separated qualified names.

/// Package part of a qualified type name (`a.b.C` -> `a.b`, `C` -> ``).
pub fn parent_package(qualified_name: &str) -> &str {
    qualified_name
        .rfind('.')
        .map(|idx| &qualified_name[..idx])
        .unwrap_or("")
}

/// Simple part of a qualified name (`a.b.C` -> `C`).
pub fn simple_name(qualified_name: &str) -> &str {
    qualified_name
        .rfind('.')
        .map(|idx| &qualified_name[idx + 1..])
        .unwrap_or(qualified_name)
}

/// `true` when `ancestor` is a proper dot-prefix of `name`.
///
/// The default (empty) package is never treated as an ancestor.
pub fn is_strict_subpackage(name: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return false;
    }
    name.strip_prefix(ancestor)
        .is_some_and(|rest| rest.starts_with('.') && rest.len() > 1)
}

/// `true` when `name` equals `ancestor` or lies underneath it.
pub fn is_subpackage_or_same(name: &str, ancestor: &str) -> bool {
    name == ancestor || is_strict_subpackage(name, ancestor)
}

/// Converts a relative directory path (`com/acme/util`) into a package name.
pub fn package_from_relative_dir(relative: &std::path::Path) -> String {
    relative
        .components()
        .filter_map(|component| component.as_os_str().to_str())
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(".")
}
