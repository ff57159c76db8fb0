//! Path → dependency identifier normalization.
//!
//! A file at `src/app/model.js` with root `src` becomes the identifier
//! `app.model`. The same function is used when indexing files and when
//! documenting which identifier a `@require` line must use, so both sides
//! always agree.
//!
//! Root segments are matched individually, not as a prefix: any path
//! segment equal to one of them is dropped. This lets a root nested at
//! arbitrary depth (`test/fixtures/correct`) disappear from identifiers.

/// Character joining the remaining path segments of an identifier.
pub const ID_SEPARATOR: char = '.';

/// Separator used to split file paths and root directories into segments.
pub const PATH_SEPARATOR: char = '/';

/// Split a configured root directory into the segments elided from ids.
///
/// Empty segments (leading `/`, `//`, trailing `/`) are dropped.
#[must_use]
pub fn root_segments(root: &str) -> Vec<String> {
    root.split(PATH_SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Derive the dependency identifier for `file_path`.
///
/// Never fails. An empty identifier is a legal result and is left to the
/// graph builder to reject (it cannot be named by a `@require` line).
#[must_use]
pub fn normalize<S: AsRef<str>>(root_segments: &[S], file_path: &str) -> String {
    let stem = strip_extension(file_path);

    stem.split(PATH_SEPARATOR)
        .filter(|segment| {
            !segment.is_empty() && !root_segments.iter().any(|root| root.as_ref() == *segment)
        })
        .collect::<Vec<_>>()
        .join(&ID_SEPARATOR.to_string())
}

/// Everything before the final `.`, or the whole path if it has none.
fn strip_extension(file_path: &str) -> &str {
    file_path
        .rfind('.')
        .map_or(file_path, |dot| &file_path[..dot])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_file_under_root() {
        assert_eq!(normalize(&["root"], "root/sub/name.js"), "sub.name");
    }

    #[test]
    fn file_without_matching_root() {
        let none: [&str; 0] = [];
        assert_eq!(normalize(&none, "name.js"), "name");
        assert_eq!(normalize(&["src"], "name.js"), "name");
    }

    #[test]
    fn deep_root_is_elided_segment_by_segment() {
        let root = root_segments("test/fixtures/correct");
        assert_eq!(root, vec!["test", "fixtures", "correct"]);
        assert_eq!(
            normalize(&root, "test/fixtures/correct/model/user.js"),
            "model.user"
        );
    }

    #[test]
    fn root_segment_is_dropped_anywhere_in_the_path() {
        assert_eq!(normalize(&["src"], "lib/src/a.js"), "lib.a");
    }

    #[test]
    fn only_last_extension_is_stripped() {
        assert_eq!(normalize(&["src"], "src/widget.min.js"), "widget.min");
    }

    #[test]
    fn path_without_extension_is_kept() {
        assert_eq!(normalize(&["src"], "src/Makefile"), "Makefile");
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(normalize(&["src"], "/src//a/b.js"), "a.b");
    }

    #[test]
    fn file_named_after_root_yields_empty_id() {
        assert_eq!(normalize(&["src"], "src.js"), "");
    }

    #[test]
    fn root_segments_ignores_empty_parts() {
        assert_eq!(root_segments("/src/"), vec!["src"]);
        assert!(root_segments("").is_empty());
    }
}
