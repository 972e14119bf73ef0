use {
    crate::{RoiContext, StreamConfig, StreamError},
    algorithm::{Invocable, InvokeError, PluginRegistry, Value},
    bytes::Bytes,
    com::MultipartEncoder,
    std::sync::Arc,
    store::{Camera, Repository, TenantScope},
    tokio::{sync::mpsc, task::JoinHandle},
    video::{FrameSource, SourceOpener, VideoInConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Starting,
    Streaming,
    Draining,
    Closed,
    Errored,
}

/// What a viewer asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamRequest {
    camera_id: String,
    inference: bool,
    algorithm_id: Option<String>,
    action: Option<String>,
}

impl StreamRequest {
    /// Frames as captured, never passed to an algorithm.
    pub fn raw(camera_id: impl Into<String>) -> Self {
        Self {
            camera_id: camera_id.into(),
            inference: false,
            algorithm_id: None,
            action: None,
        }
    }

    /// Frames annotated by the requested algorithm, or the camera's own one.
    pub fn inference(camera_id: impl Into<String>) -> Self {
        Self {
            inference: true,
            ..Self::raw(camera_id)
        }
    }

    pub fn with_algorithm(mut self, algorithm_id: impl Into<String>) -> Self {
        self.algorithm_id = Some(algorithm_id.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn camera_id(&self) -> &str {
        &self.camera_id
    }

    pub fn is_inference(&self) -> bool {
        self.inference
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamReport {
    pub emitted: u64,
    pub skipped: u64,
    pub state: StreamState,
}

/// Everything needed to start sessions. Cheap to clone.
#[derive(Clone)]
pub struct Pipeline {
    repository: Repository,
    registry: Arc<PluginRegistry>,
    opener: Arc<dyn SourceOpener>,
    video_config: VideoInConfig,
    config: StreamConfig,
}

impl Pipeline {
    pub fn new(
        repository: Repository,
        registry: Arc<PluginRegistry>,
        opener: Arc<dyn SourceOpener>,
    ) -> Self {
        Self {
            repository,
            registry,
            opener,
            video_config: VideoInConfig::default(),
            config: StreamConfig::default(),
        }
    }

    /// Capture settings for raw feeds. Inference feeds always keep only the newest frame.
    pub fn with_video_config(mut self, video_config: VideoInConfig) -> Self {
        self.video_config = video_config;
        self
    }

    pub fn with_config(mut self, config: StreamConfig) -> Self {
        self.config = config;
        self
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Resolve the camera, its ROIs and the algorithm, then open the source.
    ///
    /// Lookups happen before the source is opened, so a missing camera or
    /// algorithm never touches the upstream feed.
    pub async fn start(
        &self,
        scope: &TenantScope,
        request: &StreamRequest,
    ) -> Result<StreamSession, StreamError> {
        let camera = self.repository.camera(scope, &request.camera_id)?;

        let (invocable, rois, video_config) = if request.inference {
            let rois = self.repository.camera_rois(scope, &camera.id)?;
            let algorithm_id = request
                .algorithm_id
                .as_deref()
                .or(camera.algorithm_id.as_deref());
            let invocable = match algorithm_id {
                Some(algorithm_id) => {
                    let action = request
                        .action
                        .as_deref()
                        .unwrap_or(self.config.default_action());
                    Some(
                        self.registry
                            .resolve(&self.repository, algorithm_id, action)?,
                    )
                }
                None => None,
            };
            let video_config = self.video_config.clone().with_buffer_depth(0);
            (invocable, rois, video_config)
        } else {
            (None, Vec::new(), self.video_config.clone())
        };

        let source = self.opener.open(&camera.feed_url, &video_config).await?;
        let context = RoiContext::new(&camera, rois, scope.company_id());
        log::info!(
            "stream: starting camera {} of {} ({}, {} rois)",
            camera.id,
            context.company_id(),
            invocable
                .as_ref()
                .map(|i| format!("{}.{}", i.module(), i.action()))
                .unwrap_or_else(|| "raw".to_string()),
            context.rois().len()
        );

        Ok(StreamSession {
            camera,
            context,
            invocable,
            source,
            config: self.config.clone(),
            state: StreamState::Starting,
        })
    }
}

// run one action call off the async workers; a panicking plugin fails the frame only
async fn infer(
    invocable: &Invocable,
    context: &Value,
    sequence: u64,
    image: Bytes,
) -> Result<Bytes, InvokeError> {
    let payload = Value::map()
        .with("image", image)
        .with("sequence", sequence)
        .with("context", context.clone());
    let invocable = invocable.clone();
    let result = tokio::task::spawn_blocking(move || invocable.call(payload))
        .await
        .map_err(|e| InvokeError::Failed(format!("action aborted: {e}")))??;
    result
        .get("image")
        .and_then(Value::to_bytes)
        .ok_or_else(|| InvokeError::InvalidPayload("result carries no image".to_string()))
}

/// One viewer's live feed.
pub struct StreamSession {
    camera: Camera,
    context: RoiContext,
    invocable: Option<Invocable>,
    source: Box<dyn FrameSource>,
    config: StreamConfig,
    state: StreamState,
}

impl StreamSession {
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn context(&self) -> &RoiContext {
        &self.context
    }

    pub fn invocable(&self) -> Option<&Invocable> {
        self.invocable.as_ref()
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Stream until the source ends, the viewer goes away, or inference keeps
    /// failing. The frame source is closed on every path.
    pub async fn run(mut self, sender: mpsc::Sender<Bytes>) -> StreamReport {
        self.state = StreamState::Streaming;
        let encoder = MultipartEncoder::default();
        let context = self.context.to_value();
        let max_failures = self.config.max_consecutive_failures();
        let mut emitted = 0u64;
        let mut skipped = 0u64;
        let mut failures = 0u32;

        self.state = loop {
            let next = tokio::select! {
                biased;
                _ = sender.closed() => {
                    log::info!("stream: viewer of camera {} disconnected", self.camera.id);
                    break StreamState::Draining;
                }
                next = self.source.next_frame() => next,
            };
            let frame = match next {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    log::info!("stream: source of camera {} ended", self.camera.id);
                    break StreamState::Draining;
                }
                Err(error) => {
                    log::error!("stream: source of camera {} failed: {}", self.camera.id, error);
                    break StreamState::Errored;
                }
            };

            let jpeg = match &self.invocable {
                None => frame.data,
                Some(invocable) => match infer(invocable, &context, frame.sequence, frame.data).await
                {
                    Ok(jpeg) => {
                        failures = 0;
                        jpeg
                    }
                    Err(error) => {
                        skipped += 1;
                        failures += 1;
                        log::warn!(
                            "stream: camera {} frame {} skipped: {} ({} in a row)",
                            self.camera.id,
                            frame.sequence,
                            error,
                            failures
                        );
                        if failures > max_failures {
                            log::error!(
                                "stream: camera {} giving up after {} failed inferences",
                                self.camera.id,
                                failures
                            );
                            break StreamState::Errored;
                        }
                        continue;
                    }
                },
            };

            if sender.send(encoder.encode_part(&jpeg)).await.is_err() {
                log::info!("stream: viewer of camera {} disconnected", self.camera.id);
                break StreamState::Draining;
            }
            emitted += 1;
        };

        self.source.close();
        if self.state == StreamState::Draining {
            self.state = StreamState::Closed;
        }
        log::info!(
            "stream: camera {} {:?} after {} frames ({} skipped)",
            self.camera.id,
            self.state,
            emitted,
            skipped
        );
        StreamReport {
            emitted,
            skipped,
            state: self.state,
        }
    }

    /// Run on a new task. The receiver yields encoded multipart parts.
    pub fn spawn(self) -> (JoinHandle<StreamReport>, mpsc::Receiver<Bytes>) {
        let (sender, receiver) = mpsc::channel(self.config.channel_capacity());
        (tokio::spawn(self.run(sender)), receiver)
    }
}
