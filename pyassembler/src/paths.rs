//! Output-root-relative path handling.
//!
//! Every path that reaches an [`AssemblyReport`](crate::report::AssemblyReport)
//! is expressed relative to the output root and lexically normalized, so the
//! same file is always reported under the same key no matter how the caller
//! spelled it.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding normal component. Never touches the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Express `path` relative to `root`, as a `/`-separated string.
///
/// Paths outside `root` climb out with `..`, matching what a relativize +
/// normalize pair produces.
pub fn relative_to(root: &Path, path: &Path) -> String {
    let root = normalize(root);
    let path = normalize(path);

    let root_parts: Vec<_> = root.components().collect();
    let path_parts: Vec<_> = path.components().collect();
    let common = root_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..root_parts.len() {
        parts.push("..".to_string());
    }
    for component in &path_parts[common..] {
        parts.push(component.as_os_str().to_string_lossy().into_owned());
    }
    parts.join("/")
}

/// The `.pyi` sibling of a `.py` path, if `path` is a Python source file.
pub fn stub_sibling(path: &Path) -> Option<PathBuf> {
    let name = path.to_str()?;
    if !name.ends_with(PYTHON_SOURCE_SUFFIX) {
        return None;
    }
    Some(PathBuf::from(format!("{}{}", name, STUB_INTERFACE_SUFFIX)))
}

/// Suffix of Python source files.
pub const PYTHON_SOURCE_SUFFIX: &str = ".py";

/// Appended to a Python source path to name its stub interface (`.py` → `.pyi`).
pub const STUB_INTERFACE_SUFFIX: &str = "i";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_descendant() {
        assert_eq!(
            relative_to(Path::new("/out"), Path::new("/out/pkg/a.py")),
            "pkg/a.py"
        );
    }

    #[test]
    fn test_relative_normalizes_both_sides() {
        assert_eq!(
            relative_to(Path::new("/out/./"), Path::new("/out/pkg/../x.py")),
            "x.py"
        );
    }

    #[test]
    fn test_relative_outside_root() {
        assert_eq!(
            relative_to(Path::new("/out/gen"), Path::new("/out/lib/y.py")),
            "../lib/y.py"
        );
    }

    #[test]
    fn test_relative_of_root_itself_is_empty() {
        assert_eq!(relative_to(Path::new("/out"), Path::new("/out")), "");
    }

    #[test]
    fn test_normalize_keeps_leading_parent() {
        assert_eq!(normalize(Path::new("../a/./b/..")), PathBuf::from("../a"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_stub_sibling() {
        assert_eq!(
            stub_sibling(Path::new("/out/mod.py")),
            Some(PathBuf::from("/out/mod.pyi"))
        );
        assert_eq!(stub_sibling(Path::new("/out/lib.so")), None);
    }
}
