use {com::ComError, std::fmt};

#[derive(Debug)]
pub enum VideoError {
    SourceUnavailable(String),
    Stream(String),
    Com(ComError),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::SourceUnavailable(msg) => write!(f, "source unavailable: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Com(err) => write!(f, "multipart error: {err}"),
        }
    }
}

impl std::error::Error for VideoError {}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Stream(err.to_string())
    }
}

impl From<ComError> for VideoError {
    fn from(err: ComError) -> Self {
        VideoError::Com(err)
    }
}
