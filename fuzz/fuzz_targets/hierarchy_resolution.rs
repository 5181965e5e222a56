#![no_main]

use keyed_di::{DiError, Injector, Mappings, Resolver};
use libfuzzer_sys::fuzz_target;
use std::sync::Arc;

const TAGS: [&str; 4] = ["String", "Int", "Array<Int>", "Example.Person"];
const QUALIFIERS: [&str; 3] = ["name", "age", "numbers"];

fn id_for(byte: u8) -> String {
    let tag = TAGS[(byte as usize) % TAGS.len()];
    match (byte as usize / TAGS.len()) % (QUALIFIERS.len() + 1) {
        0 => tag.to_string(),
        q => format!("{} {}", tag, QUALIFIERS[q - 1]),
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte: chain depth; then pairs of (injector level, identifier) registrations
    let depth = (data[0] % 5) as usize + 1;
    let mut tables: Vec<Mappings> = (0..depth).map(|_| Mappings::new()).collect();

    for pair in data[1..].chunks(2) {
        let [level, key] = pair else { break };
        let level = *level as usize % depth;
        let id = id_for(*key);
        if key % 3 == 0 {
            tables[level].add_singleton_factory(id, move |_| level);
        } else {
            tables[level].add_value(id, level);
        }
    }

    let mut chain: Vec<Injector> = Vec::with_capacity(depth);
    for (level, mappings) in tables.into_iter().enumerate() {
        let parent = chain.last().cloned();
        chain.push(Injector::new(format!("level{}", level), parent, mappings));
    }
    let leaf = chain.last().cloned().unwrap();

    for byte in 0..=u8::MAX {
        let id = id_for(byte);
        let located = leaf.locate(id.as_str());
        match leaf.get::<usize>(id.as_str()) {
            Ok(level) => {
                let location = located.expect("resolvable ids must be locatable");
                assert!(*level < depth);
                // Repeated lookups of singletons return the cached value
                let again = leaf.get::<usize>(id.as_str()).unwrap();
                if location.lifetime == keyed_di::Lifetime::Singleton {
                    assert!(Arc::ptr_eq(&level, &again));
                }
            }
            Err(DiError::Unresolved { injector, .. }) => {
                assert!(located.is_none());
                assert_eq!(injector, "level0");
            }
            Err(other) => panic!("unexpected error: {}", other),
        }
    }
});
