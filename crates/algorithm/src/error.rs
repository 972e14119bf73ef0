use {std::fmt, store::StoreError};

/// Failure raised by a single action call.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeError {
    /// The payload does not have the shape the action needs.
    InvalidPayload(String),
    Failed(String),
}

impl fmt::Display for InvokeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvokeError::InvalidPayload(msg) => write!(f, "invalid payload: {msg}"),
            InvokeError::Failed(msg) => write!(f, "action failed: {msg}"),
        }
    }
}

impl std::error::Error for InvokeError {}

impl From<image::ImageError> for InvokeError {
    fn from(err: image::ImageError) -> Self {
        InvokeError::Failed(err.to_string())
    }
}

#[derive(Debug)]
pub enum RegistryError {
    /// No descriptor, or no registered plugin for the descriptor's model.
    NotFound(String),
    NoSuchAction { algorithm: String, action: String },
    Store(StoreError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::NotFound(what) => write!(f, "{what} not found"),
            RegistryError::NoSuchAction { algorithm, action } => {
                write!(f, "algorithm {algorithm} has no action {action}")
            }
            RegistryError::Store(err) => write!(f, "store error: {err}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<StoreError> for RegistryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => RegistryError::NotFound(what),
            other => RegistryError::Store(other),
        }
    }
}
