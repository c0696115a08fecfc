//! ID prefixes for generated identifiers.
//!
//! IDs are `{prefix}-{hex}`, generated by the database layer
//! (`QualisDb::generate_id`). Append-only records (snapshots, config changes)
//! get 16 hex chars; everything else gets 8.

pub const PREFIX_COLLECTOR: &str = "col";
pub const PREFIX_PROJECT: &str = "prj";
pub const PREFIX_SNAPSHOT: &str = "snp";
pub const PREFIX_CONFIG_CHANGE: &str = "chg";
pub const PREFIX_COMPONENT: &str = "cmp";

/// Every prefix in use, for tests and validation.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_COLLECTOR,
    PREFIX_PROJECT,
    PREFIX_SNAPSHOT,
    PREFIX_CONFIG_CHANGE,
    PREFIX_COMPONENT,
];

/// Random bytes behind an id with this prefix.
#[must_use]
pub fn random_bytes(prefix: &str) -> usize {
    if prefix == PREFIX_SNAPSHOT || prefix == PREFIX_CONFIG_CHANGE {
        8
    } else {
        4
    }
}

/// Check whether `id` has the shape `{prefix}-{hex}` with the hex width
/// [`random_bytes`] gives for `prefix`.
#[must_use]
pub fn has_prefix(id: &str, prefix: &str) -> bool {
    let width = random_bytes(prefix) * 2;
    id.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|hex| hex.len() == width && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for prefix in ALL_PREFIXES {
            assert!(seen.insert(*prefix), "duplicate prefix {prefix}");
        }
    }

    #[test]
    fn has_prefix_checks_shape() {
        assert!(has_prefix("prj-0a1b2c3d", PREFIX_PROJECT));
        assert!(!has_prefix("prj-0a1b2c3", PREFIX_PROJECT));
        assert!(!has_prefix("snp-0a1b2c3d", PREFIX_PROJECT));
        assert!(!has_prefix("prj-zzzzzzzz", PREFIX_PROJECT));
    }

    #[test]
    fn append_only_records_get_wide_ids() {
        assert_eq!(random_bytes(PREFIX_SNAPSHOT), 8);
        assert_eq!(random_bytes(PREFIX_CONFIG_CHANGE), 8);
        assert_eq!(random_bytes(PREFIX_PROJECT), 4);
        assert!(has_prefix("snp-0a1b2c3d4e5f6071", PREFIX_SNAPSHOT));
        assert!(!has_prefix("snp-0a1b2c3d", PREFIX_SNAPSHOT));
        assert!(has_prefix("chg-ffffffff00000000", PREFIX_CONFIG_CHANGE));
    }
}
