use keyed_di::{Identifier, Injector, InjectorObserver, LoggingObserver, Mappings, Resolver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl InjectorObserver for Recorder {
    fn resolving(&self, id: &Identifier, injector: &str) {
        self.push(format!("resolving {}@{}", id, injector));
    }

    fn resolved(&self, id: &Identifier, injector: &str, _duration: Duration) {
        self.push(format!("resolved {}@{}", id, injector));
    }

    fn unresolved(&self, id: &Identifier, injector: &str) {
        self.push(format!("unresolved {}@{}", id, injector));
    }

    fn promoted(&self, id: &Identifier, injector: &str) {
        self.push(format!("promoted {}@{}", id, injector));
    }
}

#[test]
fn test_observer_sees_resolution_and_misses() {
    let recorder = Arc::new(Recorder::default());
    let mut mappings = Mappings::new();
    mappings.add_value("String name", "Jason".to_string());
    mappings.add_observer(recorder.clone());
    let root = Injector::new("root", None, mappings);

    root.get::<String>("String name").unwrap();
    let _ = root.get::<String>("Foo");

    assert_eq!(
        recorder.events(),
        vec![
            "resolving String name@root",
            "resolved String name@root",
            "resolving Foo@root",
            "unresolved Foo@root",
        ]
    );
}

#[test]
fn test_observer_sees_promotion_in_child() {
    let recorder = Arc::new(Recorder::default());
    let mut mappings = Mappings::new();
    mappings.add_singleton_factory("Example.Person", |_| 1u8);
    mappings.add_observer(recorder.clone());
    let root = Injector::new("root", None, mappings);
    let child = root.create_child("child", Mappings::new());

    child.get::<u8>("Example.Person").unwrap();
    child.get::<u8>("Example.Person").unwrap();

    let events = recorder.events();
    assert_eq!(events.iter().filter(|e| e.starts_with("promoted")).count(), 1);
    assert!(events.contains(&"promoted Example.Person@child".to_string()));
}

#[test]
fn test_nested_miss_reported_once() {
    let recorder = Arc::new(Recorder::default());
    let mut mappings = Mappings::new();
    mappings.add_try_factory("Int derived", |inj| inj.get::<u16>("Int missing").map(|v| *v));
    mappings.add_observer(recorder.clone());
    let root = Injector::new("root", None, mappings);

    let _ = root.get::<u16>("Int derived");

    let misses: Vec<_> = recorder
        .events()
        .into_iter()
        .filter(|e| e.starts_with("unresolved"))
        .collect();
    assert_eq!(misses, vec!["unresolved Int missing@root"]);
}

#[test]
fn test_child_observers_do_not_leak_to_parent() {
    let parent_recorder = Arc::new(Recorder::default());
    let child_recorder = Arc::new(Recorder::default());

    let mut mappings = Mappings::new();
    mappings.add_value("Int", 1u8);
    mappings.add_observer(parent_recorder.clone());
    let root = Injector::new("root", None, mappings);

    let mut child_mappings = Mappings::new();
    child_mappings.add_observer(child_recorder.clone());
    let child = root.create_child("child", child_mappings);

    child.get::<u8>("Int").unwrap();
    root.get::<u8>("Int").unwrap();

    // The parent's observer is inherited by the child
    assert_eq!(parent_recorder.events().len(), 4);
    assert_eq!(child_recorder.events(), vec!["resolving Int@child", "resolved Int@child"]);
}

#[test]
fn test_logging_observer_emits_tracing_events() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("keyed_di=trace")
        .with_test_writer()
        .try_init();

    let mut mappings = Mappings::new();
    mappings.add_singleton_factory("Example.Person", |_| "person".to_string());
    mappings.add_observer(Arc::new(LoggingObserver::with_prefix("test")));
    let root = Injector::new("root", None, mappings);

    assert_eq!(*root.get::<String>("Example.Person").unwrap(), "person");
    assert!(root.get::<String>("Foo").is_err());
}

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_logging_observer_saturates_huge_durations() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let observer = LoggingObserver::new();
        observer.resolved(&Identifier::from("Int slow"), "root", Duration::MAX);
        observer.resolved(&Identifier::from("Int fast"), "root", Duration::from_micros(42));
    });

    let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains(&format!("elapsed_us={}", u64::MAX)), "{}", output);
    assert!(output.contains("elapsed_us=42"), "{}", output);
}
