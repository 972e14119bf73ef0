use {
    crate::{Invocable, Plugin, RegistryError, Value},
    std::collections::{BTreeMap, HashMap},
    store::Repository,
};

const MODULE_ROOT: &str = "inference.models";
const METHODS_MODULE: &str = "methods";

/// Implementation reference for a model: `inference.models.<model>.methods`.
pub fn module_path(model: &str) -> String {
    format!("{MODULE_ROOT}.{model}.{METHODS_MODULE}")
}

/// Actions of every registered plugin, keyed by module path and action name.
///
/// Filled once at startup; lookups afterwards are read-only.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    actions: HashMap<(String, String), Invocable>,
    models: BTreeMap<String, Value>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, plugin: Plugin) -> Self {
        self.register(plugin);
        self
    }

    pub fn register(&mut self, plugin: Plugin) {
        let (model, info, actions) = plugin.into_parts();
        let module = module_path(&model);
        if self.models.insert(model.clone(), info).is_some() {
            log::warn!("registry: replacing plugin {}", model);
            self.actions.retain(|(m, _), _| *m != module);
        }
        log::info!(
            "registry: registered {} with {} actions",
            module,
            actions.len()
        );
        for (name, func) in actions {
            let invocable = Invocable::new(module.clone(), name.clone(), func);
            self.actions.insert((module.clone(), name), invocable);
        }
    }

    pub fn model_info(&self, model: &str) -> Option<&Value> {
        self.models.get(model)
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }

    pub fn lookup(&self, module: &str, action: &str) -> Option<&Invocable> {
        self.actions.get(&(module.to_string(), action.to_string()))
    }

    /// Resolve `action` of the algorithm stored under `algorithm_id`.
    ///
    /// The action must be listed in the descriptor and registered by its plugin;
    /// otherwise this fails with `NoSuchAction` and nothing is invoked.
    pub fn resolve(
        &self,
        repository: &Repository,
        algorithm_id: &str,
        action: &str,
    ) -> Result<Invocable, RegistryError> {
        let descriptor = repository.algorithm(algorithm_id)?;
        let module = module_path(&descriptor.path);
        if !self.models.contains_key(&descriptor.path) {
            log::warn!(
                "registry: algorithm {} needs {} which is not registered",
                algorithm_id,
                module
            );
            return Err(RegistryError::NotFound(format!("algorithm {algorithm_id}")));
        }
        let no_such_action = || RegistryError::NoSuchAction {
            algorithm: algorithm_id.to_string(),
            action: action.to_string(),
        };
        if !descriptor.actions.iter().any(|a| a == action) {
            return Err(no_such_action());
        }
        self.lookup(&module, action).cloned().ok_or_else(no_such_action)
    }
}
