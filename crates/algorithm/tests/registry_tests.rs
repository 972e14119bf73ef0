use {
    algorithm::{Plugin, PluginRegistry, RegistryError, Value, module_path},
    serde_json::json,
    std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    store::{MemoryStore, Repository},
};

fn repository() -> Repository {
    let store = MemoryStore::from_json(json!({
        "inference_algorithms": [
            { "_id": "people", "path": "crowd", "actions": ["detect", "count"] },
            { "_id": "ghost", "path": "unregistered", "actions": ["detect"] },
            { "_id": "narrow", "path": "crowd", "actions": ["detect"] }
        ]
    }))
    .expect("seed");
    Repository::new(Arc::new(store))
}

struct Calls {
    detect: Arc<AtomicUsize>,
    count: Arc<AtomicUsize>,
}

fn registry() -> (PluginRegistry, Calls) {
    let detect = Arc::new(AtomicUsize::new(0));
    let count = Arc::new(AtomicUsize::new(0));
    let calls = Calls {
        detect: detect.clone(),
        count: count.clone(),
    };
    let plugin = Plugin::new("crowd")
        .with_info(Value::map().with("name", "crowd"))
        .with_action("detect", move |_| {
            detect.fetch_add(1, Ordering::SeqCst);
            Ok(Value::map().with("action", "detect"))
        })
        .with_action("count", move |payload| {
            count.fetch_add(1, Ordering::SeqCst);
            let n = payload.get("n").and_then(Value::as_i64).unwrap_or(0);
            Ok(Value::map().with("action", "count").with("n", n + 1))
        });
    (PluginRegistry::new().with_plugin(plugin), calls)
}

#[test]
fn test_module_path() {
    assert_eq!(module_path("crowd"), "inference.models.crowd.methods");
}

#[test]
fn test_resolve_invokes_only_requested_action() {
    let (registry, calls) = registry();
    let invocable = registry
        .resolve(&repository(), "people", "count")
        .expect("count resolves");
    assert_eq!(invocable.module(), "inference.models.crowd.methods");
    assert_eq!(invocable.action(), "count");

    let result = invocable
        .call(Value::map().with("n", 41i64))
        .expect("count succeeds");
    assert_eq!(result.get("action"), Some(&Value::from("count")));
    assert_eq!(result.get("n"), Some(&Value::Int(42)));
    assert_eq!(calls.count.load(Ordering::SeqCst), 1);
    assert_eq!(calls.detect.load(Ordering::SeqCst), 0);
}

#[test]
fn test_missing_action_invokes_nothing() {
    let (registry, calls) = registry();
    let error = registry
        .resolve(&repository(), "people", "segment")
        .expect_err("segment is not exposed");
    assert!(matches!(
        error,
        RegistryError::NoSuchAction { ref algorithm, ref action }
            if algorithm == "people" && action == "segment"
    ));
    assert_eq!(calls.count.load(Ordering::SeqCst), 0);
    assert_eq!(calls.detect.load(Ordering::SeqCst), 0);
}

#[test]
fn test_action_not_listed_in_descriptor() {
    let (registry, _calls) = registry();
    assert!(matches!(
        registry.resolve(&repository(), "narrow", "count"),
        Err(RegistryError::NoSuchAction { .. })
    ));
    assert!(registry.resolve(&repository(), "narrow", "detect").is_ok());
}

#[test]
fn test_unknown_algorithm() {
    let (registry, _calls) = registry();
    let error = registry
        .resolve(&repository(), "missing", "detect")
        .expect_err("no descriptor");
    assert!(matches!(error, RegistryError::NotFound(_)));
    assert_eq!(error.to_string(), "algorithm missing not found");
}

#[test]
fn test_unregistered_plugin() {
    let (registry, _calls) = registry();
    let error = registry
        .resolve(&repository(), "ghost", "detect")
        .expect_err("no plugin");
    assert!(matches!(error, RegistryError::NotFound(_)));
    assert_eq!(error.to_string(), "algorithm ghost not found");
    assert!(!error.to_string().contains("inference.models"));
}

#[test]
fn test_model_catalog() {
    let (registry, _calls) = registry();
    assert_eq!(registry.models().collect::<Vec<_>>(), ["crowd"]);
    assert_eq!(
        registry.model_info("crowd").and_then(|i| i.get("name")),
        Some(&Value::from("crowd"))
    );
    assert!(registry.model_info("nope").is_none());
}

#[test]
fn test_reregister_replaces_actions() {
    let (mut registry, _calls) = registry();
    registry.register(Plugin::new("crowd").with_action("detect", |_| Ok(Value::Null)));
    let module = module_path("crowd");
    assert!(registry.lookup(&module, "detect").is_some());
    assert!(registry.lookup(&module, "count").is_none());
}
