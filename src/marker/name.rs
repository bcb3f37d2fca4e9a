//! Page identity derived from a request path.

/// Derive a marker name from a URL path.
///
/// `/Products/List.php` becomes `products_list`. An empty or all-slash path
/// yields an empty name.
pub fn from_path(path: &str) -> String {
    let path = path.to_lowercase();
    let path = path.trim_matches('/');

    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", path),
    };

    let stem = match file.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file,
    };

    if dir.is_empty() {
        normalize(stem)
    } else {
        normalize(&format!("{dir}/{stem}"))
    }
}

/// Normalize a raw identifier: runs of spaces collapse to one, then `-`,
/// `/`, `\`, `.` and space become `_`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_space = false;
    for c in raw.chars() {
        if c == ' ' {
            if prev_space {
                continue;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
        match c {
            '-' | '/' | '\\' | '.' | ' ' => out.push('_'),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_extension_and_joins_directories() {
        assert_eq!(from_path("/Products/List.php"), "products_list");
        assert_eq!(from_path("/admin/orders/archive.tar.gz"), "admin_orders_archive_tar");
    }

    #[test]
    fn single_segment_without_extension() {
        assert_eq!(from_path("/products/"), "products");
        assert_eq!(from_path("dashboard"), "dashboard");
    }

    #[test]
    fn dotfile_keeps_its_name() {
        assert_eq!(from_path("/.well-known"), "_well_known");
    }

    #[test]
    fn empty_paths_give_empty_name() {
        assert_eq!(from_path(""), "");
        assert_eq!(from_path("///"), "");
    }

    #[test]
    fn normalize_collapses_spaces_and_replaces_separators() {
        assert_eq!(normalize("My   Page-v2.list"), "My_Page_v2_list");
        assert_eq!(normalize(r"a\b/c"), "a_b_c");
    }

    #[test]
    fn normalize_is_idempotent() {
        for path in ["/a b/c-d.e", "/x//y/z.html", "  lead  ", r"\\srv\share.x", ""] {
            let once = normalize(&from_path(path));
            assert_eq!(normalize(&once), once, "path {path:?}");
        }
    }
}
