//! Person Demo - building a value from string-keyed mappings
//!
//! This example demonstrates:
//! - Registering constants under qualified and unqualified identifiers
//! - Wildcard fallback ("Array<StdTypes.Int> favouriteNumbers" answered by "Array<StdTypes.Int>")
//! - A singleton factory pulling its dependencies from the requesting injector
//! - A child injector overriding one value while delegating the rest
//!
//! Run with `RUST_LOG=keyed_di=debug cargo run --example person` to see
//! resolution events.

use keyed_di::*;
use std::sync::Arc;

#[derive(Debug)]
struct Person {
    name: Arc<String>,
    age: i64,
    favourite_numbers: Arc<Vec<i64>>,
    least_favourite_numbers: Arc<Vec<i64>>,
    ready: bool,
}

impl Person {
    fn new(name: Arc<String>) -> Self {
        Self {
            name,
            age: 0,
            favourite_numbers: Arc::new(Vec::new()),
            least_favourite_numbers: Arc::new(Vec::new()),
            ready: false,
        }
    }

    fn set_favourite_numbers(&mut self, numbers: Arc<Vec<i64>>) {
        self.favourite_numbers = numbers;
    }

    fn after_injection(&mut self) {
        self.ready = true;
    }
}

/// The default mappings for the demo
struct ExampleModule;

impl MappingModule for ExampleModule {
    fn register(self, mappings: &mut Mappings) -> DiResult<()> {
        mappings
            .add_value("StdTypes.Int age", 28i64)
            .add_value("String name", "Jason".to_string())
            .add_value("Array<StdTypes.Int>", vec![0i64, 1, 2])
            .add_value("Array<StdTypes.Int> leastFavouriteNumbers", vec![-1i64, 3, 366])
            .add_try_singleton_factory("Example.Person", |inj| {
                let mut person = Person::new(inj.get::<String>("String name")?);
                person.set_favourite_numbers(inj.get::<Vec<i64>>("Array<StdTypes.Int> favouriteNumbers")?);
                person.age = *inj.get::<i64>("StdTypes.Int age")?;
                person.least_favourite_numbers = inj.get::<Vec<i64>>("Array<StdTypes.Int> leastFavouriteNumbers")?;
                person.after_injection();
                Ok(person)
            });
        Ok(())
    }
}

fn describe(person: &Person) -> String {
    format!(
        "I am {}, I am {} years old and I have {} favourite numbers",
        person.name,
        person.age,
        person.favourite_numbers.len()
    )
}

fn main() -> DiResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut mappings = Mappings::new().with_module(ExampleModule)?;
    mappings.add_observer(Arc::new(LoggingObserver::new()));
    let root = Injector::new("root", None, mappings);

    let person = root.get::<Person>("Example.Person")?;
    assert!(person.ready);
    println!("{}", describe(&person));
    println!("My least favourite numbers are {:?}", person.least_favourite_numbers);

    // A child overriding the name gets its own Person
    let mut overrides = Mappings::new();
    overrides.add_value("String name", "Anna".to_string());
    let child = root.create_child("child", overrides);

    let other = child.get::<Person>("Example.Person")?;
    println!("{}", describe(&other));

    // Unknown identifiers fall back when asked to
    let nickname = child.try_get::<String>("String nickname", "none".to_string())?;
    println!("Nickname: {}", nickname);

    match child.get::<Person>("Example.Robot") {
        Err(e) => println!("Expected failure: {}", e),
        Ok(_) => println!("Unexpectedly found a robot"),
    }

    println!();
    println!("{}", graph_export::exports::to_mermaid(&child));
    Ok(())
}
