//! Property-based tests for remote URL handling.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::remote::{AliasTable, RemoteAlias, RemoteUrl};
    use proptest::prelude::*;

    fn github_alias() -> AliasTable {
        AliasTable::new(vec![RemoteAlias::new("gh:", "https://github.com/")])
    }

    // ============================================================================
    // alias round trip
    // ============================================================================

    proptest! {
        /// Property: expanding and then compacting an aliased URL yields the input
        #[test]
        fn compact_inverts_expand(suffix in "[a-zA-Z0-9_./:-]{0,40}") {
            let aliases = github_alias();
            let input = format!("gh:{suffix}");
            let expanded = aliases.expand(&input);
            prop_assert_eq!(aliases.compact(&expanded), input);
        }

        /// Property: compacting and then expanding a canonical URL yields the input
        #[test]
        fn expand_inverts_compact(suffix in "[a-zA-Z0-9_./:-]{0,40}") {
            let aliases = github_alias();
            let canonical = RemoteUrl::from_canonical(format!("https://github.com/{suffix}"));
            let compacted = aliases.compact(&canonical);
            prop_assert_eq!(aliases.expand(&compacted), canonical);
        }

        /// Property: URLs without an alias prefix pass through unchanged
        #[test]
        fn expand_without_alias_is_identity(input in "[a-fh-z][a-zA-Z0-9_./:@-]{0,40}") {
            let aliases = github_alias();
            let expanded = aliases.expand(&input);
            prop_assert_eq!(expanded.as_str(), input.as_str());
        }
    }

    // ============================================================================
    // checkout path derivation
    // ============================================================================

    proptest! {
        /// Property: URL syntax maps to host followed by the path segments
        #[test]
        fn checkout_path_of_https_url(
            host in "[a-z]{1,10}\\.(com|org|net)",
            segments in prop::collection::vec("[a-z0-9_-]{1,8}", 1..5),
        ) {
            let url = RemoteUrl::from_canonical(format!("https://{host}/{}", segments.join("/")));
            let expected = format!("{host}/{}", segments.join("/"));
            prop_assert_eq!(url.checkout_path().unwrap(), expected);
        }

        /// Property: SCP syntax maps to the same path as URL syntax, with or
        /// without the .git suffix
        #[test]
        fn checkout_path_of_scp_url(
            host in "[a-z]{1,10}\\.(com|org|net)",
            segments in prop::collection::vec("[a-z0-9_-]{1,8}", 1..5),
            suffix in prop::bool::ANY,
        ) {
            let path = segments.join("/");
            let git = if suffix { ".git" } else { "" };
            let scp = RemoteUrl::from_canonical(format!("git@{host}:{path}{git}"));
            let https = RemoteUrl::from_canonical(format!("https://{host}/{path}"));
            prop_assert_eq!(scp.checkout_path().unwrap(), https.checkout_path().unwrap());
        }

        /// Property: derived checkout paths never escape the root
        #[test]
        fn checkout_path_stays_relative(input in "[a-z:/@.]{1,30}") {
            if let Ok(path) = RemoteUrl::from_canonical(input).checkout_path() {
                prop_assert!(!path.starts_with('/'));
                prop_assert!(!path.split('/').any(|s| s.is_empty() || s == ".."));
            }
        }

        /// Property: the basename does not depend on a trailing .git
        #[test]
        fn basename_ignores_git_suffix(path in "[a-z0-9]{1,8}(/[a-z0-9]{1,8}){0,3}") {
            let plain = RemoteUrl::from_canonical(format!("https://example.org/{path}"));
            let suffixed = RemoteUrl::from_canonical(format!("https://example.org/{path}.git"));
            prop_assert_eq!(plain.basename(), suffixed.basename());
            prop_assert!(plain.matches(&suffixed));
        }
    }
}
