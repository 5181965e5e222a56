/// Unit tests for MappingDescriptor and Location

use keyed_di::{Identifier, Injector, Lifetime, Mappings, Resolver};

#[test]
fn test_descriptor_accessors() {
    let mut mappings = Mappings::new();
    mappings.add_value("Array<Int> leastFavouriteNumbers", vec![1i64]);
    mappings.add_factory("Array<Int>", |_| vec![0i64]);

    let descriptors = mappings.descriptors();
    assert_eq!(descriptors.len(), 2);

    let wildcard = &descriptors[0];
    assert_eq!(wildcard.id, Identifier::from("Array<Int>"));
    assert!(wildcard.is_wildcard());
    assert_eq!(wildcard.qualifier(), None);
    assert_eq!(wildcard.lifetime, Lifetime::Transient);
    assert!(!wildcard.resolved);

    let exact = &descriptors[1];
    assert_eq!(exact.type_tag(), "Array<Int>");
    assert_eq!(exact.qualifier(), Some("leastFavouriteNumbers"));
    assert!(!exact.is_wildcard());
    assert!(exact.resolved);
}

#[test]
fn test_injector_descriptors_track_promotion() {
    let mut mappings = Mappings::new();
    mappings.add_singleton_factory("Example.Person", |_| 1u8);
    let root = Injector::new("root", None, mappings);

    assert!(!root.descriptors()[0].resolved);
    root.get::<u8>("Example.Person").unwrap();
    assert!(root.descriptors()[0].resolved);
    assert_eq!(root.len(), 1);
    assert!(!root.is_empty());
}

#[test]
fn test_location_fields() {
    let mut mappings = Mappings::new();
    mappings.add_singleton_factory("Logger", |_| 1u8);
    let root = Injector::new("root", None, mappings);
    let child = root.create_child("child", Mappings::new());

    let location = child.locate("Logger http").unwrap();
    assert_eq!(location.injector, "root");
    assert_eq!(location.matched, Identifier::from("Logger"));
    assert!(location.wildcard);
    assert_eq!(location.lifetime, Lifetime::Singleton);
    assert!(!location.resolved);

    child.get::<u8>("Logger http").unwrap();
    let promoted = child.locate("Logger http").unwrap();
    assert_eq!(promoted.injector, "child");
    assert!(promoted.resolved);
}

#[test]
fn test_lifetime_names() {
    assert_eq!(Lifetime::Singleton.as_str(), "singleton");
    assert_eq!(Lifetime::Transient.as_str(), "transient");
}
