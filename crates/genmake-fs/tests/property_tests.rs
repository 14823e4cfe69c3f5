use genmake_fs::PathResolver;
use genmake_fs::path::real_location;
use proptest::prelude::*;
use tempfile::TempDir;

fn segments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,7}", 1..5)
}

proptest! {
    #[test]
    fn test_relativize_round_trip(target in segments(), other in segments()) {
        let temp = TempDir::new().unwrap();
        let root = real_location(temp.path());
        let resolver = PathResolver::new();

        let raw = target.join("/");
        let original = resolver.resolve(&raw, Some(&root)).unwrap();

        // Relativizing to its own base keeps the location and the text.
        let same = original.relativize(&root).unwrap();
        prop_assert_eq!(same.location(), original.location());
        prop_assert_eq!(same.relative_string().unwrap(), raw);

        // Relativizing to any other directory keeps the location, and the
        // relative text resolves back to it from that directory.
        let new_base = root.join(other.join("/"));
        let moved = original.relativize(&new_base).unwrap();
        prop_assert_eq!(moved.location(), original.location());

        let text = moved.relative_string().unwrap();
        let reresolved = resolver.resolve(&text, Some(&new_base)).unwrap();
        prop_assert_eq!(reresolved.location(), original.location());
    }
}
