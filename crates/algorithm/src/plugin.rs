use {
    crate::{InvokeError, Value},
    std::{fmt, sync::Arc},
};

pub type ActionFn = dyn Fn(Value) -> Result<Value, InvokeError> + Send + Sync;

/// A resolved action, callable without knowing which plugin provides it.
#[derive(Clone)]
pub struct Invocable {
    module: String,
    action: String,
    func: Arc<ActionFn>,
}

impl Invocable {
    pub(crate) fn new(module: String, action: String, func: Arc<ActionFn>) -> Self {
        Self {
            module,
            action,
            func,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn call(&self, payload: Value) -> Result<Value, InvokeError> {
        (self.func)(payload)
    }
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invocable({}.{})", self.module, self.action)
    }
}

/// A model implementation and the actions it exposes.
pub struct Plugin {
    model: String,
    info: Value,
    actions: Vec<(String, Arc<ActionFn>)>,
}

impl Plugin {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            info: Value::map(),
            actions: Vec::new(),
        }
    }

    /// Metadata served by the model catalog.
    pub fn with_info(mut self, info: Value) -> Self {
        self.info = info;
        self
    }

    pub fn with_action<F>(mut self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Value) -> Result<Value, InvokeError> + Send + Sync + 'static,
    {
        self.actions.push((name.into(), Arc::new(func)));
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn info(&self) -> &Value {
        &self.info
    }

    pub fn action_names(&self) -> Vec<&str> {
        self.actions.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub(crate) fn into_parts(self) -> (String, Value, Vec<(String, Arc<ActionFn>)>) {
        (self.model, self.info, self.actions)
    }
}
