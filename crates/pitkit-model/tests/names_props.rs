use pitkit_model::names::{is_strict_subpackage, is_subpackage_or_same, parent_package};
use proptest::prelude::*;

fn package_name() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z][a-z0-9]{0,5}", 1..5).prop_map(|segments| segments.join("."))
}

proptest! {
    #[test]
    fn a_package_is_never_its_own_strict_subpackage(name in package_name()) {
        prop_assert!(!is_strict_subpackage(&name, &name));
        prop_assert!(is_subpackage_or_same(&name, &name));
    }

    #[test]
    fn appending_a_segment_creates_a_strict_subpackage(name in package_name(), tail in "[a-z]{1,6}") {
        let child = format!("{name}.{tail}");
        prop_assert!(is_strict_subpackage(&child, &name));
        prop_assert!(!is_strict_subpackage(&name, &child));
        prop_assert_eq!(parent_package(&child), name.as_str());
    }
}
