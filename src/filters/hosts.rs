use std::sync::LazyLock;

use regex::Regex;

/// Shape of a resolver entry carrying a host: a key ending in a quote or
/// `[a-z0-9]`, a colon, at least one space, one or more quotes, an
/// IP-address-like run of digits, dots and spaces, a single space, then the
/// host name. Only the leading `[a-z0-9-]` run of the host name is captured,
/// so `local-data-ptr: "10.0.0.11 master01.hdp.local"` yields `master01`.
pub const HOST_ENTRY_PATTERN: &str = r#"(["a-z0-9]: *) +"+([0-9. ]*) ([a-z0-9-]+)"#;

static HOST_ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HOST_ENTRY_PATTERN).expect("host entry pattern is valid"));

/// Host names found in resolver file contents, in order of appearance.
/// Duplicates are kept; non-matching text is skipped.
pub fn extract_hosts(contents: &str) -> Vec<String> {
    HOST_ENTRY
        .captures_iter(contents)
        .filter_map(|caps| caps.get(3))
        .map(|m| m.as_str().to_string())
        .collect()
}
