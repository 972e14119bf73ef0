use {
    crate::*,
    bytes::Bytes,
    com::{ComError, read_part},
    std::{
        collections::VecDeque,
        path::{Path, PathBuf},
        time::Duration,
    },
    tokio::{fs::File, io::BufReader},
};

enum FilesState {
    Closed,
    Images(VecDeque<PathBuf>),
    Mjpeg(BufReader<File>),
}

/// Recorded footage on disk: a directory of JPEG files played back in name
/// order, or a single file holding a multipart MJPEG stream.
pub(crate) struct FilesDevice {
    path: PathBuf,
    frame_interval: Duration,
    delivered: bool,
    state: FilesState,
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

impl FilesDevice {
    pub fn new(path: &str, config: &VideoInConfig) -> Self {
        Self {
            path: PathBuf::from(path),
            frame_interval: config.frame_interval(),
            delivered: false,
            state: FilesState::Closed,
        }
    }

    pub async fn open(&mut self) -> Result<(), VideoError> {
        let unavailable =
            |e: std::io::Error| VideoError::SourceUnavailable(format!("{:?}: {}", self.path, e));
        let metadata = tokio::fs::metadata(&self.path).await.map_err(unavailable)?;

        self.state = if metadata.is_dir() {
            let mut entries = tokio::fs::read_dir(&self.path).await.map_err(unavailable)?;
            let mut images = Vec::new();
            while let Some(entry) = entries.next_entry().await.map_err(unavailable)? {
                let path = entry.path();
                if is_jpeg(&path) {
                    images.push(path);
                }
            }
            if images.is_empty() {
                return Err(VideoError::SourceUnavailable(format!(
                    "{:?} holds no jpeg files",
                    self.path
                )));
            }
            images.sort();
            FilesState::Images(images.into())
        } else {
            let file = File::open(&self.path).await.map_err(unavailable)?;
            FilesState::Mjpeg(BufReader::new(file))
        };
        self.delivered = false;
        Ok(())
    }

    pub async fn capture(&mut self) -> Result<Option<Bytes>, VideoError> {
        if self.delivered && !self.frame_interval.is_zero() {
            tokio::time::sleep(self.frame_interval).await;
        }
        let data = match &mut self.state {
            FilesState::Closed => {
                return Err(VideoError::Stream(format!("{:?} is not open", self.path)));
            }
            FilesState::Images(images) => match images.pop_front() {
                Some(path) => Bytes::from(tokio::fs::read(&path).await?),
                None => return Ok(None),
            },
            FilesState::Mjpeg(reader) => match read_part(reader).await {
                Ok(part) => part.data,
                Err(ComError::ConnectionClosed) => return Ok(None),
                Err(error) => return Err(error.into()),
            },
        };
        self.delivered = true;
        Ok(Some(data))
    }

    pub fn close(&mut self) {
        self.state = FilesState::Closed;
    }
}
