//! Scenario tests for code registration, reporting and aggregation.
//!
//! This module exercises the registry's public contract end to end:
//! uniqueness of codes, sentinel fallback, fatal tracking, queries and merge.

#[cfg(test)]
mod registry_tests {
    use std::collections::HashSet;

    use tracing_subscriber::{EnvFilter, fmt};

    use crate::{
        blunder::{Blunder, SENTINEL_CODE, SENTINEL_NAME},
        config::RegistryConfig,
        error::RegistryError,
        registry::Registry,
    };

    fn init_logging() {
        let _ = fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn untimed_registry(identifier: &str) -> Registry {
        init_logging();
        let config = RegistryConfig {
            timestamps: false,
            ..RegistryConfig::default()
        };
        Registry::with_config(identifier, &config)
    }

    #[test]
    fn test_new_registry_state() {
        for identifier in ["test", "t", "", "Test Instance", "TestInstance ", " TestInstance"] {
            let registry = Registry::new(identifier);

            assert_eq!(registry.identifier(), identifier);
            assert_eq!(registry.codes().len(), 1);
            assert_eq!(registry.code_name(SENTINEL_CODE), Some(SENTINEL_NAME));
            assert!(registry.reported().is_empty());
            assert!(registry.self_blunders().is_empty());
            assert!(!registry.has_fatal());
            assert!(registry.none_fatal());
            assert!(registry.exit_policy().is_none());
        }
    }

    #[test]
    fn test_register_code_accepts_new_codes() {
        let cases = [(1, ""), (1, "One"), (20, "Twenty"), (-5, "Negative")];

        for (code, name) in cases {
            let mut registry = Registry::new("test");
            assert!(registry.register_code(code, name), "code {code} rejected");
            assert_eq!(registry.code_name(code), Some(name));
            assert_eq!(registry.code_name(SENTINEL_CODE), Some(SENTINEL_NAME));
            assert!(registry.self_blunders().is_empty());
        }
    }

    #[test]
    fn test_register_code_rejects_sentinel() {
        let mut registry = Registry::new("test");

        assert!(!registry.register_code(SENTINEL_CODE, "Zero"));
        assert!(!registry.register_code(4, SENTINEL_NAME));

        assert_eq!(registry.codes().len(), 1);
        assert_eq!(registry.code_name(SENTINEL_CODE), Some(SENTINEL_NAME));
        assert_eq!(registry.self_blunders().len(), 2);
    }

    #[test]
    fn test_register_code_duplicate_id() {
        let mut registry = untimed_registry("test");

        assert!(registry.register_code(1, "IO"));
        assert!(!registry.register_code(1, "IO"));

        assert_eq!(registry.codes().len(), 2);
        assert_eq!(registry.code_name(1), Some("IO"));
        assert_eq!(
            registry.self_blunders(),
            &[Blunder::new(
                SENTINEL_CODE,
                SENTINEL_NAME,
                false,
                "Attempted to use existing Code id \"1\"."
            )]
        );
    }

    #[test]
    fn test_register_code_duplicate_name() {
        let mut registry = untimed_registry("test");

        assert!(registry.register_code(1, "one"));
        assert!(!registry.register_code(2, "one"));
        assert!(registry.register_code(3, "One"));

        assert_eq!(registry.code_name(2), None);
        assert_eq!(registry.self_blunders().len(), 1);
        assert_eq!(
            registry.self_blunders()[0].message(),
            "Attempted to use existing Code name \"one\"."
        );
    }

    #[test]
    fn test_unregister_code_is_unsupported() {
        let mut registry = Registry::new("test");
        registry.register_code(1, "one");

        assert!(matches!(
            registry.unregister_code(1),
            Err(RegistryError::UnregisterUnsupported { code: 1 })
        ));
        assert_eq!(registry.code_name(1), Some("one"));
        assert!(registry.self_blunders().is_empty());
    }

    #[test]
    fn test_report_registered_code() {
        let mut registry = Registry::new("svc");
        registry.register_code(1, "IO");

        for message in ["disk full", ""] {
            let blunder = registry.report(1, message);
            assert_eq!(blunder.code(), 1);
            assert_eq!(blunder.code_name(), "IO");
            assert!(!blunder.is_fatal());
            assert_eq!(blunder.message(), message);
            assert!(blunder.time().is_some());
            assert_eq!(registry.reported().last(), Some(&blunder));
        }

        assert_eq!(registry.reported().len(), 2);
        assert!(registry.self_blunders().is_empty());
        assert!(!registry.has_fatal());
    }

    #[test]
    fn test_report_fatal_registered_code() {
        let mut registry = Registry::new("svc");
        registry.register_code(1, "IO");

        let blunder = registry.report_fatal(1, "BOOM!");
        assert!(blunder.is_fatal());
        assert_eq!(blunder.code_name(), "IO");
        assert!(registry.has_fatal());
        assert!(!registry.none_fatal());

        registry.report(1, "poof");
        assert!(registry.has_fatal());
    }

    #[test]
    fn test_report_unregistered_code_falls_back() {
        let mut registry = untimed_registry("svc");
        registry.register_code(1, "IO");

        let blunder = registry.report(15, "Test Blunder");
        assert_eq!(blunder.code(), SENTINEL_CODE);
        assert_eq!(blunder.code_name(), SENTINEL_NAME);
        assert!(!blunder.is_fatal());
        assert_eq!(blunder.message(), "Test Blunder");

        let fatal = registry.report_fatal(15, "Test Blunder");
        assert_eq!(fatal.code(), SENTINEL_CODE);
        assert!(fatal.is_fatal());

        assert_eq!(registry.reported().len(), 2);
        assert_eq!(registry.self_blunders().len(), 2);
        assert!(registry.self_blunders().iter().all(|b| !b.is_fatal()));
        assert_eq!(
            registry.self_blunders()[0].message(),
            "Attempted to use unregistered Code id \"15\"."
        );
    }

    #[test]
    fn test_svc_scenario() {
        let mut registry = Registry::new("svc");
        assert!(registry.register_code(1, "IO"));

        let rendered = registry.report(1, "disk full").to_string();
        for part in ["NON-FATAL", "1", "IO", "disk full"] {
            assert!(rendered.contains(part), "{rendered} lacks {part}");
        }
        assert!(!registry.has_fatal());

        let before = registry.self_blunders().len();
        let fatal = registry.report_fatal(99, "boom");
        assert_eq!(fatal.code(), SENTINEL_CODE);
        assert_eq!(fatal.code_name(), SENTINEL_NAME);
        assert!(registry.has_fatal());
        assert_eq!(registry.self_blunders().len(), before + 1);
    }

    #[test]
    fn test_fatal_and_non_fatal_partition() {
        let mut registry = untimed_registry("svc");
        registry.register_code(1, "IO");
        registry.register_code(2, "Net");

        registry.report(1, "a");
        registry.report_fatal(2, "b");
        registry.report(3, "c");
        registry.report_fatal(1, "d");
        registry.report(2, "e");

        let fatals: Vec<&str> = registry.fatals().iter().map(|b| b.message()).collect();
        let non_fatals: Vec<&str> = registry.non_fatals().iter().map(|b| b.message()).collect();
        assert_eq!(fatals, ["b", "d"]);
        assert_eq!(non_fatals, ["a", "c", "e"]);

        let fatal_set: HashSet<&str> = fatals.into_iter().collect();
        let non_fatal_set: HashSet<&str> = non_fatals.into_iter().collect();
        assert!(fatal_set.is_disjoint(&non_fatal_set));
        assert_eq!(fatal_set.len() + non_fatal_set.len(), registry.reported().len());
    }

    #[test]
    fn test_by_code_and_grouping() {
        let mut registry = untimed_registry("svc");
        registry.register_code(1, "IO");
        registry.register_code(2, "Net");

        registry.report(1, "first io");
        registry.report(2, "first net");
        registry.report_fatal(1, "second io");
        registry.report(9, "unknown");
        registry.report(2, "second net");

        let io: Vec<&str> = registry.by_code(1).iter().map(|b| b.message()).collect();
        assert_eq!(io, ["first io", "second io"]);
        assert!(registry.by_code(9).is_empty());
        assert_eq!(registry.by_code(SENTINEL_CODE).len(), 1);

        let groups = registry.grouped_by_code();
        assert_eq!(groups.len(), 3);
        for (code, group) in &groups {
            assert_eq!(*group, registry.by_code(*code));
        }

        let ordered = registry.ordered_by_code();
        assert_eq!(ordered.len(), registry.reported().len());
        let positions = |message: &str| ordered.iter().position(|b| b.message() == message);
        assert!(positions("first io") < positions("second io"));
        assert!(positions("first net") < positions("second net"));
    }

    #[test]
    fn test_merge_reclassifies_through_target() {
        let mut source = untimed_registry("worker");
        source.register_code(1, "IO");
        source.register_code(2, "Net");
        source.report(1, "disk full");
        source.report_fatal(2, "link down");

        let mut target = untimed_registry("svc");
        target.register_code(1, "Storage");
        target.report(1, "earlier");

        target.merge(&source);

        assert_eq!(target.reported().len(), 3);
        let merged = &target.reported()[1..];
        assert_eq!(merged[0], Blunder::new(1, "Storage", false, "disk full"));
        assert_eq!(
            merged[1],
            Blunder::new(SENTINEL_CODE, SENTINEL_NAME, true, "link down")
        );
        assert!(target.has_fatal());
        assert_eq!(target.self_blunders().len(), 1);
        assert!(source.self_blunders().is_empty());
        assert_eq!(source.reported().len(), 2);
    }

    #[test]
    fn test_merge_keeps_original_timestamps() {
        let mut source = Registry::new("worker");
        source.register_code(1, "IO");
        let original = source.report(1, "disk full");

        let mut target = Registry::new("svc");
        target.register_code(1, "IO");
        target.merge(&source);

        assert_eq!(target.reported()[0].time(), original.time());
        assert_eq!(target.reported()[0], original);
    }
}
