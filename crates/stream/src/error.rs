use {algorithm::RegistryError, std::fmt, store::StoreError, video::VideoError};

/// Failure to start a session. Once streaming, failures end the session
/// instead and show up in its `StreamReport`.
#[derive(Debug)]
pub enum StreamError {
    NotFound(String),
    SourceUnavailable(String),
    Registry(RegistryError),
    Store(StoreError),
    Source(VideoError),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::NotFound(what) => write!(f, "{what} not found"),
            StreamError::SourceUnavailable(msg) => write!(f, "source unavailable: {msg}"),
            StreamError::Registry(err) => write!(f, "{err}"),
            StreamError::Store(err) => write!(f, "{err}"),
            StreamError::Source(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for StreamError {}

impl From<StoreError> for StreamError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => StreamError::NotFound(what),
            other => StreamError::Store(other),
        }
    }
}

impl From<RegistryError> for StreamError {
    fn from(err: RegistryError) -> Self {
        StreamError::Registry(err)
    }
}

impl From<VideoError> for StreamError {
    fn from(err: VideoError) -> Self {
        match err {
            VideoError::SourceUnavailable(msg) => StreamError::SourceUnavailable(msg),
            other => StreamError::Source(other),
        }
    }
}
