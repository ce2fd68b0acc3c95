//! Path helpers.

use std::path::{Component, Path, PathBuf};

/// Express `target` relative to the directory `base_dir`.
///
/// Both paths are made absolute against the current directory first, so
/// mixing relative and absolute inputs works. Falls back to `target`
/// unchanged when no relative form exists (e.g. different Windows drives).
pub fn relative_to(target: &Path, base_dir: &Path) -> PathBuf {
    let (Ok(target_abs), Ok(base_abs)) = (std::path::absolute(target), std::path::absolute(base_dir))
    else {
        return target.to_path_buf();
    };
    let target_abs = normalize(&target_abs);
    let base_abs = normalize(&base_abs);

    let target_parts: Vec<Component> = target_abs.components().collect();
    let base_parts: Vec<Component> = base_abs.components().collect();

    if target_parts.first() != base_parts.first() {
        return target.to_path_buf();
    }

    let common = target_parts
        .iter()
        .zip(base_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// The directory a file lives in, treating a bare file name as `.`.
pub fn parent_dir(file: &Path) -> PathBuf {
    match file.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
