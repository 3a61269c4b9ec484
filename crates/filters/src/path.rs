//! Slash-separated, repo-relative path helpers.
//!
//! Paths handled here never use the platform separator: they are the keys of
//! the directory cache and the subjects of glob matching. The repository root
//! is the empty string.

/// Lexically normalises a slash-separated path.
///
/// Repeated separators collapse, `.` segments are removed and `..` segments
/// consume the preceding segment where one exists. A rooted path stays
/// rooted, and `..` above the root is dropped. An empty result is `.` (or
/// `/` for rooted input), so `clean("./")` is `.` rather than the root key.
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_owned();
    }
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }
    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_owned(),
        (false, false) => joined,
    }
}

/// Joins `name` onto the repo-relative directory `rel` and cleans the result.
///
/// Unlike [`clean`], a result naming the root is the empty string, so
/// `join("", ".")` is `""` and `join("a", "..")` is `""`.
pub fn join(rel: &str, name: &str) -> String {
    let combined = match (rel.is_empty(), name.is_empty()) {
        (true, true) => return String::new(),
        (true, false) => clean(name),
        (false, true) => clean(rel),
        (false, false) => clean(&format!("{rel}/{name}")),
    };
    if combined == "." {
        String::new()
    } else {
        combined
    }
}

/// Returns the parent of `rel`, or `None` for the root.
pub fn parent(rel: &str) -> Option<&str> {
    if rel.is_empty() {
        return None;
    }
    Some(rel.rfind('/').map_or("", |index| &rel[..index]))
}

/// Returns the final segment of `rel`; the root's base is empty.
pub fn base(rel: &str) -> &str {
    rel.rfind('/').map_or(rel, |index| &rel[index + 1..])
}

/// Returns every directory from the root down to `rel`, inclusive.
///
/// ```
/// assert_eq!(filters::path::ancestors("a/b"), vec!["", "a", "a/b"]);
/// assert_eq!(filters::path::ancestors(""), vec![""]);
/// ```
pub fn ancestors(rel: &str) -> Vec<&str> {
    let mut out = vec![""];
    if rel.is_empty() {
        return out;
    }
    for (index, byte) in rel.bytes().enumerate() {
        if byte == b'/' {
            out.push(&rel[..index]);
        }
    }
    out.push(rel);
    out
}

/// Returns true when `rel` is `root` or lies beneath it.
pub fn is_within(rel: &str, root: &str) -> bool {
    root.is_empty()
        || rel == root
        || (rel.len() > root.len() && rel.starts_with(root) && rel.as_bytes()[root.len()] == b'/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_matches_lexical_rules() {
        assert_eq!(clean(""), ".");
        assert_eq!(clean("./"), ".");
        assert_eq!(clean("./a"), "a");
        assert_eq!(clean("dir3/"), "dir3");
        assert_eq!(clean("a//b/./c/.."), "a/b");
        assert_eq!(clean("../x"), "../x");
        assert_eq!(clean("a/../../x"), "../x");
        assert_eq!(clean("/../x"), "/x");
        assert_eq!(clean("/"), "/");
    }

    #[test]
    fn join_treats_root_as_empty() {
        assert_eq!(join("", "a.go"), "a.go");
        assert_eq!(join("pkg", "**/*.pb.go"), "pkg/**/*.pb.go");
        assert_eq!(join("pkg", "."), "pkg");
        assert_eq!(join("", "."), "");
        assert_eq!(join("a", ".."), "");
        assert_eq!(join("", ""), "");
    }

    #[test]
    fn parent_and_base() {
        assert_eq!(parent(""), None);
        assert_eq!(parent("a"), Some(""));
        assert_eq!(parent("a/b/c"), Some("a/b"));
        assert_eq!(base("a/b/c"), "c");
        assert_eq!(base("a"), "a");
        assert_eq!(base(""), "");
    }

    #[test]
    fn within_respects_segment_boundaries() {
        assert!(is_within("a/b", ""));
        assert!(is_within("a", "a"));
        assert!(is_within("a/b", "a"));
        assert!(!is_within("ab", "a"));
        assert!(!is_within("", "a"));
    }
}
