use {
    crate::RuntimeError,
    algorithm::{InvokeError, RegistryError},
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde_json::json,
    std::fmt,
    store::StoreError,
    stream::StreamError,
};

/// Error answered to an HTTP client as `{"error": <message>}`.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Unprocessable(String),
    MethodNotAllowed,
    SourceUnavailable(String),
    /// Detail is logged, never sent.
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(what) => write!(f, "{what} not found"),
            ApiError::BadRequest(msg) => write!(f, "{msg}"),
            ApiError::Unprocessable(msg) => write!(f, "{msg}"),
            ApiError::MethodNotAllowed => write!(f, "Method is not allowed"),
            ApiError::SourceUnavailable(_) => write!(f, "camera source unavailable"),
            ApiError::Internal(_) => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::SourceUnavailable(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal(detail) => log::error!("api: {}", detail),
            ApiError::SourceUnavailable(detail) => log::warn!("api: {}", detail),
            _ => log::debug!("api: {}", self),
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(what) => ApiError::NotFound(what),
            err @ RegistryError::NoSuchAction { .. } => ApiError::BadRequest(err.to_string()),
            RegistryError::Store(err) => err.into(),
        }
    }
}

impl From<InvokeError> for ApiError {
    fn from(err: InvokeError) -> Self {
        match err {
            InvokeError::InvalidPayload(msg) => ApiError::Unprocessable(msg),
            InvokeError::Failed(msg) => ApiError::Internal(format!("action failed: {msg}")),
        }
    }
}

impl From<StreamError> for ApiError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::NotFound(what) => ApiError::NotFound(what),
            StreamError::SourceUnavailable(msg) => ApiError::SourceUnavailable(msg),
            StreamError::Registry(err) => err.into(),
            StreamError::Store(err) => err.into(),
            StreamError::Source(err) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<RuntimeError> for ApiError {
    fn from(err: RuntimeError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
