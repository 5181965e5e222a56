#![no_main]

use keyed_di::{DiError, Identifier, Injector, Mappings, Resolver};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let id = Identifier::from(text);
    let parsed = Identifier::parse(text);

    // Parsing only rejects empty text or a missing type token
    let invalid = text.is_empty() || text.starts_with(char::is_whitespace);
    assert_eq!(parsed.is_err(), invalid);

    if let Some(wildcard) = id.wildcard() {
        assert_eq!(wildcard.as_str(), id.type_tag());
        assert!(id.qualifier().is_some());
    } else {
        assert_eq!(id.type_tag(), id.as_str());
    }

    // Registering under the fuzzed identifier must make it resolvable
    let mut mappings = Mappings::new();
    mappings.add_value(id.clone(), text.len());
    assert_eq!(mappings.is_empty(), invalid);
    let root = Injector::new("root", None, mappings);

    match root.get::<usize>(id.clone()) {
        Ok(len) => {
            assert!(!invalid);
            assert_eq!(*len, text.len());
        }
        Err(DiError::InvalidIdentifier(_)) => assert!(invalid),
        Err(other) => panic!("unexpected error for {:?}: {}", id, other),
    }

    // Any qualified variant of the type token falls back to a wildcard mapping
    if !invalid {
        let mut mappings = Mappings::new();
        mappings.add_value(id.type_tag(), 1u8);
        let root = Injector::new("root", None, mappings);
        assert_eq!(*root.get::<u8>(id.qualified("fuzz")).unwrap(), 1);
    }
});
