use {
    crate::{VideoError, VideoFrame, VideoIn, VideoInConfig},
    async_trait::async_trait,
};

/// A pull-based sequence of frames.
#[async_trait]
pub trait FrameSource: Send {
    /// Wait for the next frame. `Ok(None)` means the source is exhausted.
    async fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError>;

    /// Release the upstream connection. Calling it more than once is harmless.
    fn close(&mut self);
}

/// Opens frame sources from URLs.
#[async_trait]
pub trait SourceOpener: Send + Sync {
    async fn open(
        &self,
        url: &str,
        config: &VideoInConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError>;
}

/// Opens `VideoIn` sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoOpener;

#[async_trait]
impl SourceOpener for VideoOpener {
    async fn open(
        &self,
        url: &str,
        config: &VideoInConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError> {
        let videoin = VideoIn::open(url, config.clone()).await?;
        Ok(Box::new(videoin))
    }
}
