//! Property tests for path resolution and name escaping.

use proptest::prelude::*;

use pvmodel::path::{components, escape_name, normalize, resolve, unescape_name, Component};

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,6}"
}

fn absolute_path() -> impl Strategy<Value = String> {
    prop::collection::vec(segment(), 0..5).prop_map(|s| format!("/{}", s.join("/")))
}

/// Relative paths mixing names, `.` and `..`.
fn relative_path() -> impl Strategy<Value = String> {
    let part = prop_oneof![3 => segment(), 1 => Just(".".to_string()), 1 => Just("..".to_string())];
    prop::collection::vec(part, 1..6).prop_map(|s| s.join("/"))
}

proptest! {
    #[test]
    fn absolute_paths_resolve_to_themselves(base in absolute_path(), path in absolute_path()) {
        prop_assert_eq!(resolve(&base, &path).unwrap(), path);
    }

    #[test]
    fn normalizing_does_not_change_resolution(base in absolute_path(), path in relative_path()) {
        let direct = resolve(&base, &path);
        let normalized = normalize(&path).and_then(|n| resolve(&base, &n));
        match (direct, normalized) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            (a, b) => prop_assert!(false, "diverged: {:?} vs {:?}", a.ok(), b.ok()),
        }
    }

    #[test]
    fn resolved_paths_are_normal(base in absolute_path(), path in relative_path()) {
        if let Ok(resolved) = resolve(&base, &path) {
            prop_assert!(resolved.starts_with('/'));
            prop_assert!(components(&resolved)
                .unwrap()
                .iter()
                .all(|c| matches!(c, Component::Root | Component::Name(_))));
        }
    }

    #[test]
    fn escaping_round_trips(name in "\\PC{0,16}") {
        let escaped = escape_name(&name, false);
        prop_assert_eq!(unescape_name(&escaped).unwrap(), name);
    }
}

#[test]
fn test_climbing_above_root_fails() {
    assert!(resolve("/", "..").is_err());
    assert!(resolve("/a", "../..").is_err());
    assert!(normalize("/a/../..").is_err());
    assert_eq!(normalize("../a/./b/..").unwrap(), "../a");
}
