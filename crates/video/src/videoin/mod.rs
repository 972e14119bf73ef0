use {
    crate::*,
    async_trait::async_trait,
    bytes::Bytes,
    std::time::Duration,
    tokio::{
        sync::{mpsc, watch},
        task::JoinHandle,
    },
};

pub(crate) mod files;
pub(crate) mod mjpeg;

// delay before reopening a live source after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

pub(crate) enum Device {
    Mjpeg(mjpeg::MjpegDevice),
    Files(files::FilesDevice),
}

impl Device {
    fn for_url(url: &str, config: &VideoInConfig) -> Result<Self, VideoError> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(Device::Mjpeg(mjpeg::MjpegDevice::new(url, config)?))
        } else if let Some(path) = url.strip_prefix("file://") {
            Ok(Device::Files(files::FilesDevice::new(path, config)))
        } else {
            Err(VideoError::SourceUnavailable(format!(
                "unsupported source url: {url}"
            )))
        }
    }

    async fn open(&mut self) -> Result<(), VideoError> {
        match self {
            Device::Mjpeg(device) => device.open().await,
            Device::Files(device) => device.open().await,
        }
    }

    // Ok(None) when the source has no more frames
    async fn capture(&mut self) -> Result<Option<Bytes>, VideoError> {
        match self {
            Device::Mjpeg(device) => device.capture().await,
            Device::Files(device) => device.capture().await,
        }
    }

    fn close(&mut self) {
        match self {
            Device::Mjpeg(device) => device.close(),
            Device::Files(device) => device.close(),
        }
    }

    // only live sources are worth reopening
    fn is_live(&self) -> bool {
        matches!(self, Device::Mjpeg(_))
    }
}

#[derive(Clone)]
enum Slot {
    Empty,
    Frame(VideoFrame),
    Ended,
    Failed(String),
}

enum FrameSender {
    Latest(watch::Sender<Slot>),
    Queue(mpsc::Sender<Result<VideoFrame, VideoError>>),
}

impl FrameSender {
    // Err when the consumer is gone
    async fn send(&self, frame: VideoFrame) -> Result<(), ()> {
        match self {
            FrameSender::Latest(sender) => sender.send(Slot::Frame(frame)).map_err(|_| ()),
            FrameSender::Queue(sender) => sender.send(Ok(frame)).await.map_err(|_| ()),
        }
    }

    // a terminal failure reaches the consumer after any frames still queued
    async fn finish(self, failure: Option<VideoError>) {
        match (self, failure) {
            (FrameSender::Latest(sender), None) => {
                sender.send_replace(Slot::Ended);
            }
            (FrameSender::Latest(sender), Some(error)) => {
                sender.send_replace(Slot::Failed(error.to_string()));
            }
            (FrameSender::Queue(sender), Some(error)) => {
                let _ = sender.send(Err(error)).await;
            }
            (FrameSender::Queue(_), None) => {}
        }
    }
}

enum FrameReceiver {
    Latest(watch::Receiver<Slot>),
    Queue(mpsc::Receiver<Result<VideoFrame, VideoError>>),
}

impl FrameReceiver {
    async fn recv(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        match self {
            FrameReceiver::Latest(receiver) => loop {
                let closed = receiver.changed().await.is_err();
                let slot = receiver.borrow_and_update().clone();
                match slot {
                    Slot::Failed(message) => return Err(VideoError::Stream(message)),
                    Slot::Frame(frame) if !closed => return Ok(Some(frame)),
                    Slot::Ended => return Ok(None),
                    _ if closed => return Ok(None),
                    _ => continue,
                }
            },
            FrameReceiver::Queue(receiver) => receiver.recv().await.transpose(),
        }
    }
}

fn frame_channel(depth: usize) -> (FrameSender, FrameReceiver) {
    if depth == 0 {
        let (sender, receiver) = watch::channel(Slot::Empty);
        (FrameSender::Latest(sender), FrameReceiver::Latest(receiver))
    } else {
        let (sender, receiver) = mpsc::channel(depth);
        (FrameSender::Queue(sender), FrameReceiver::Queue(receiver))
    }
}

/// A frame source backed by a capture task.
///
/// The task pulls frames from the upstream device as fast as it delivers them
/// and hands them over according to the configured buffering depth. Closing or
/// dropping the `VideoIn` stops the task and releases the upstream connection.
pub struct VideoIn {
    url: String,
    receiver: FrameReceiver,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    async fn run_worker(
        url: String,
        mut device: Device,
        sender: FrameSender,
        reconnect_attempts: u32,
    ) {
        let mut sequence = 0u64;
        let mut failures = 0u32;
        let failure = loop {
            match device.capture().await {
                Ok(Some(data)) => {
                    failures = 0;
                    let frame = VideoFrame { sequence, data };
                    sequence += 1;
                    if sender.send(frame).await.is_err() {
                        log::debug!("video worker: consumer of {} went away", url);
                        break None;
                    }
                }
                Ok(None) => {
                    log::info!("video worker: {} exhausted after {} frames", url, sequence);
                    break None;
                }
                Err(error) => {
                    log::error!("video worker: capture from {} failed: {}", url, error);
                    if !device.is_live() || failures >= reconnect_attempts {
                        break Some(error);
                    }
                    failures += 1;
                    log::info!(
                        "video worker: reconnecting to {} ({}/{})",
                        url,
                        failures,
                        reconnect_attempts
                    );
                    device.close();
                    tokio::time::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS)).await;
                    if let Err(error) = device.open().await {
                        log::warn!("video worker: reopening {} failed: {}", url, error);
                    }
                }
            }
        };
        device.close();
        sender.finish(failure).await;
    }

    /// Connect to `url` and start capturing.
    ///
    /// Fails with `VideoError::SourceUnavailable` if the scheme is not supported
    /// or the source cannot be opened.
    pub async fn open(url: &str, config: VideoInConfig) -> Result<Self, VideoError> {
        let mut device = Device::for_url(url, &config)?;
        device.open().await?;
        log::info!(
            "video: opened {} (buffer depth {})",
            url,
            config.buffer_depth()
        );

        let (sender, receiver) = frame_channel(config.buffer_depth());
        let join_handle = tokio::spawn(Self::run_worker(
            url.to_string(),
            device,
            sender,
            config.reconnect_attempts(),
        ));

        Ok(Self {
            url: url.to_string(),
            receiver,
            join_handle: Some(join_handle),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_closed(&self) -> bool {
        self.join_handle.is_none()
    }
}

#[async_trait]
impl FrameSource for VideoIn {
    async fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        if self.join_handle.is_none() {
            return Ok(None);
        }
        self.receiver.recv().await
    }

    fn close(&mut self) {
        if let Some(join_handle) = self.join_handle.take() {
            join_handle.abort();
            log::info!("video: closed {}", self.url);
        }
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.close();
    }
}
