//! `@require` declaration scanning.
//!
//! A dependency declaration is the literal tag `@require`, at least one
//! whitespace character, then a dotted identifier such as `app.model.user`.
//! The tag is usually placed in a comment but the scanner does not care
//! where it appears:
//!
//! ```text
//! // @require app.model.user
//! /* @require util */
//! ```

use std::sync::LazyLock;

use regex::Regex;

static REQUIRE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@require\s+([A-Za-z0-9_]+(?:\.[A-Za-z0-9_]+)*)")
        .unwrap_or_else(|err| panic!("invalid @require pattern: {err}"))
});

/// Return every identifier declared with `@require` in `source`, in order.
///
/// Duplicates are preserved; identifiers are not validated here.
#[must_use]
pub fn extract_dependencies(source: &str) -> Vec<String> {
    REQUIRE_RE
        .captures_iter(source)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
