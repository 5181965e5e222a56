use keyed_di::config::DEFAULT_MAX_DEPTH;
use keyed_di::{DiError, Injector, InjectorConfig, Mappings, Resolver, TryGetPolicy};
use serial_test::serial;
use std::env;

const VARS: [&str; 3] = ["KEYED_DI_MAX_DEPTH", "KEYED_DI_WILDCARD_FALLBACK", "KEYED_DI_TRY_GET_POLICY"];

fn clear_vars() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_defaults() {
    let config = InjectorConfig::default();
    assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(config.max_depth, 64);
    assert!(config.wildcard_fallback);
    assert_eq!(config.try_get_policy, TryGetPolicy::UnresolvedOnly);
}

#[test]
#[serial]
fn test_from_env_unset_keeps_defaults() {
    clear_vars();
    assert_eq!(InjectorConfig::from_env("keyed_di").unwrap(), InjectorConfig::default());
}

#[test]
#[serial]
fn test_from_env_reads_all_settings() {
    clear_vars();
    env::set_var("KEYED_DI_MAX_DEPTH", "32");
    env::set_var("KEYED_DI_WILDCARD_FALLBACK", "off");
    env::set_var("KEYED_DI_TRY_GET_POLICY", "any-error");

    let config = InjectorConfig::from_env("KEYED_DI").unwrap();
    clear_vars();

    assert_eq!(config.max_depth, 32);
    assert!(!config.wildcard_fallback);
    assert_eq!(config.try_get_policy, TryGetPolicy::AnyError);
}

#[test]
#[serial]
fn test_from_env_reads_requested_only_policy() {
    clear_vars();
    env::set_var("KEYED_DI_TRY_GET_POLICY", "requested-only");
    let config = InjectorConfig::from_env("KEYED_DI").unwrap();
    clear_vars();
    assert_eq!(config.try_get_policy, TryGetPolicy::RequestedOnly);
}

#[test]
#[serial]
fn test_from_env_rejects_malformed_values() {
    clear_vars();
    env::set_var("KEYED_DI_MAX_DEPTH", "deep");
    let depth = InjectorConfig::from_env("KEYED_DI");
    clear_vars();
    assert!(matches!(depth, Err(DiError::Config(ref msg)) if msg.starts_with("KEYED_DI_MAX_DEPTH")));

    env::set_var("KEYED_DI_WILDCARD_FALLBACK", "perhaps");
    let wildcard = InjectorConfig::from_env("KEYED_DI");
    clear_vars();
    assert!(matches!(wildcard, Err(DiError::Config(_))));

    env::set_var("KEYED_DI_TRY_GET_POLICY", "never");
    let policy = InjectorConfig::from_env("KEYED_DI");
    clear_vars();
    assert!(matches!(policy, Err(DiError::Config(_))));
}

#[test]
#[serial]
fn test_env_config_drives_an_injector() {
    clear_vars();
    env::set_var("KEYED_DI_WILDCARD_FALLBACK", "false");
    let config = InjectorConfig::from_env("KEYED_DI").unwrap();
    clear_vars();

    let mut mappings = Mappings::new();
    mappings.add_value("Array<Int>", vec![0i64, 1, 2]);
    let root = Injector::with_config("root", None, mappings, config);
    assert!(root.get::<Vec<i64>>("Array<Int> favouriteNumbers").is_err());
}

#[test]
fn test_max_depth_bounds_factory_recursion() {
    // Each level asks for the next one; 10 levels need depth 10
    let mut mappings = Mappings::new();
    for level in 1..=10u32 {
        let below = format!("Int level{}", level - 1);
        mappings.add_try_factory(format!("Int level{}", level), move |inj| {
            inj.get::<u32>(below.as_str()).map(|v| *v + 1)
        });
    }
    mappings.add_value("Int level0", 0u32);

    let shallow = InjectorConfig::default().with_max_depth(5);
    let root = Injector::with_config("root", None, mappings, shallow);
    assert!(matches!(root.get::<u32>("Int level10"), Err(DiError::DepthExceeded(5))));

    let deep = root.create_child("deep", Mappings::new());
    assert!(deep.get::<u32>("Int level10").is_err());
    let roomy = Injector::with_config(
        "roomy",
        Some(root.clone()),
        Mappings::new(),
        InjectorConfig::default().with_max_depth(64),
    );
    assert_eq!(*roomy.get::<u32>("Int level10").unwrap(), 10);
}

#[cfg(feature = "config")]
#[test]
fn test_from_json() {
    let config = InjectorConfig::from_json_str(r#"{"max_depth": 8, "wildcard_fallback": false}"#).unwrap();
    assert_eq!(config.max_depth, 8);
    assert!(!config.wildcard_fallback);
    assert_eq!(config.try_get_policy, TryGetPolicy::UnresolvedOnly);

    assert!(matches!(InjectorConfig::from_json_str("{"), Err(DiError::Config(_))));
}
