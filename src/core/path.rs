//! Path normalization and resolution.
//!
//! Session paths are absolute: they always start with `/` and never contain
//! empty segments, `.` or `..`. Both functions here are total over every
//! input string.

/// Normalize a path by resolving `.` and `..` components.
///
/// Returns an absolute path. `..` at the root is a no-op.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    format!("/{}", parts.join("/"))
}

/// Resolve `path` against the absolute `current` directory.
///
/// - `""` and `"."` return `current` unchanged
/// - `/...` is normalized on its own
/// - anything else is joined onto `current`, then normalized
pub fn resolve(path: &str, current: &str) -> String {
    if path.is_empty() || path == "." {
        return current.to_string();
    }

    if path.starts_with('/') {
        return normalize(path);
    }

    normalize(&format!("{}/{}", current, path))
}

/// Split an absolute path into its segments. The root has none.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
