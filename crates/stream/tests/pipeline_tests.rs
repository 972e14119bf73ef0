use {
    algorithm::{InvokeError, Plugin, PluginRegistry, Value},
    async_trait::async_trait,
    bytes::Bytes,
    com::MultipartEncoder,
    serde_json::json,
    std::{
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    store::{MemoryStore, Repository, TenantScope},
    stream::{Pipeline, StreamConfig, StreamError, StreamRequest, StreamState},
    tokio::time::timeout,
    video::{FrameSource, SourceOpener, VideoError, VideoFrame, VideoInConfig, VideoOpener},
};

#[derive(Default)]
struct Counters {
    opens: AtomicUsize,
    closes: AtomicUsize,
    depths: Mutex<Vec<usize>>,
}

struct FakeSource {
    // None: never ends
    frames: Option<u64>,
    interval: Option<Duration>,
    next: u64,
    counters: Arc<Counters>,
}

#[async_trait]
impl FrameSource for FakeSource {
    async fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        if self.frames.is_some_and(|n| self.next >= n) {
            return Ok(None);
        }
        match self.interval {
            Some(interval) => tokio::time::sleep(interval).await,
            None if self.frames.is_none() => std::future::pending::<()>().await,
            None => {}
        }
        let sequence = self.next;
        self.next += 1;
        Ok(Some(VideoFrame {
            sequence,
            data: Bytes::from(format!("raw-{sequence}")),
        }))
    }

    fn close(&mut self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeOpener {
    frames: Option<u64>,
    interval: Option<Duration>,
    counters: Arc<Counters>,
}

#[async_trait]
impl SourceOpener for FakeOpener {
    async fn open(
        &self,
        url: &str,
        config: &VideoInConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError> {
        if url.contains("offline") {
            return Err(VideoError::SourceUnavailable(url.to_string()));
        }
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        self.counters
            .depths
            .lock()
            .expect("lock")
            .push(config.buffer_depth());
        Ok(Box::new(FakeSource {
            frames: self.frames,
            interval: self.interval,
            next: 0,
            counters: self.counters.clone(),
        }))
    }
}

fn repository() -> Repository {
    let store = MemoryStore::from_json(json!({
        "camera_acme": [
            {
                "_id": "cam1",
                "company_id": "acme",
                "cctv_feed_url": "rtsp://fake/cam1",
                "type": "entrance",
                "algorithm_id": "every_kth"
            },
            { "_id": "cam2", "company_id": "acme", "cctv_feed_url": "rtsp://fake/cam2" },
            { "_id": "cam3", "company_id": "acme", "cctv_feed_url": "rtsp://offline/cam3" }
        ],
        "camera_rois": [
            { "_id": "r1", "camera_id": "cam1", "coordinates": [[0, 0], [4, 0], [4, 4]], "label": "door" },
            { "_id": "r2", "camera_id": "cam1", "coordinates": [[1, 1], [2, 2], [3, 1]] },
            { "_id": "r3", "camera_id": "cam2", "coordinates": [[1, 1], [2, 2], [3, 1]] }
        ],
        "inference_algorithms": [
            { "_id": "every_kth", "path": "flaky", "actions": ["annotate"] },
            { "_id": "broken", "path": "broken", "actions": ["annotate"] },
            { "_id": "recorder", "path": "recorder", "actions": ["annotate"] }
        ]
    }))
    .expect("seed");
    Repository::new(Arc::new(store))
}

const K: i64 = 3;

fn registry(contexts: Arc<Mutex<Vec<Value>>>) -> PluginRegistry {
    PluginRegistry::new()
        .with_plugin(Plugin::new("flaky").with_action("annotate", |payload| {
            let sequence = payload
                .get("sequence")
                .and_then(Value::as_i64)
                .ok_or_else(|| InvokeError::InvalidPayload("no sequence".to_string()))?;
            if sequence % K == 0 {
                return Err(InvokeError::Failed(format!("frame {sequence}")));
            }
            Ok(Value::map().with("image", Bytes::from(format!("annotated-{sequence}"))))
        }))
        .with_plugin(
            Plugin::new("broken")
                .with_action("annotate", |_| Err(InvokeError::Failed("always".to_string()))),
        )
        .with_plugin(Plugin::new("recorder").with_action("annotate", move |payload| {
            let context = payload.get("context").cloned().unwrap_or_default();
            contexts.lock().expect("lock").push(context);
            Ok(Value::map().with("image", payload.get("image").cloned().unwrap_or_default()))
        }))
}

fn pipeline(
    frames: Option<u64>,
    interval: Option<Duration>,
) -> (Pipeline, Arc<Counters>, Arc<Mutex<Vec<Value>>>) {
    let counters = Arc::new(Counters::default());
    let contexts = Arc::new(Mutex::new(Vec::new()));
    let opener = FakeOpener {
        frames,
        interval,
        counters: counters.clone(),
    };
    let pipeline = Pipeline::new(
        repository(),
        Arc::new(registry(contexts.clone())),
        Arc::new(opener),
    )
    .with_video_config(VideoInConfig::default().with_buffer_depth(4))
    .with_config(StreamConfig::default().with_max_consecutive_failures(3));
    (pipeline, counters, contexts)
}

async fn collect(mut receiver: tokio::sync::mpsc::Receiver<Bytes>) -> Vec<Bytes> {
    let mut parts = Vec::new();
    while let Some(part) = timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("part timed out")
    {
        parts.push(part);
    }
    parts
}

#[tokio::test]
async fn test_every_kth_failure_is_skipped_in_order() {
    const N: u64 = 10;
    let (pipeline, counters, _) = pipeline(Some(N), None);
    let session = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::inference("cam1"))
        .await
        .expect("start");
    let (handle, receiver) = session.spawn();
    let parts = collect(receiver).await;
    let report = handle.await.expect("join");

    let encoder = MultipartEncoder::default();
    let expected: Vec<Bytes> = (0..N as i64)
        .filter(|s| s % K != 0)
        .map(|s| encoder.encode_part(format!("annotated-{s}").as_bytes()))
        .collect();
    let skipped = N.div_ceil(K as u64);
    assert_eq!(parts, expected);
    assert_eq!(report.emitted, N - skipped);
    assert_eq!(report.skipped, skipped);
    assert_eq!(report.state, StreamState::Closed);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_consecutive_failures_escalate() {
    let (pipeline, counters, _) = pipeline(None, Some(Duration::from_millis(1)));
    let session = pipeline
        .start(
            &TenantScope::new("acme"),
            &StreamRequest::inference("cam1").with_algorithm("broken"),
        )
        .await
        .expect("start");
    let (handle, receiver) = session.spawn();
    let parts = collect(receiver).await;
    let report = timeout(Duration::from_secs(5), handle)
        .await
        .expect("session should end")
        .expect("join");

    assert!(parts.is_empty());
    assert_eq!(report.state, StreamState::Errored);
    assert_eq!(report.skipped, 4);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_camera_opens_nothing() {
    let (pipeline, counters, _) = pipeline(Some(1), None);
    let result = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::inference("nope"))
        .await;
    assert!(matches!(result, Err(StreamError::NotFound(_))));
    assert_eq!(counters.opens.load(Ordering::SeqCst), 0);

    let result = pipeline
        .start(&TenantScope::new("initech"), &StreamRequest::raw("cam1"))
        .await;
    assert!(matches!(result, Err(StreamError::NotFound(_))));
    assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_algorithm_opens_nothing() {
    let (pipeline, counters, _) = pipeline(Some(1), None);
    let result = pipeline
        .start(
            &TenantScope::new("acme"),
            &StreamRequest::inference("cam1").with_algorithm("missing"),
        )
        .await;
    assert!(matches!(result, Err(StreamError::Registry(_))));
    let result = pipeline
        .start(
            &TenantScope::new("acme"),
            &StreamRequest::inference("cam1").with_action("count"),
        )
        .await;
    assert!(matches!(result, Err(StreamError::Registry(_))));
    assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unreachable_source() {
    let (pipeline, _, _) = pipeline(Some(1), None);
    let result = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::raw("cam3"))
        .await;
    assert!(matches!(result, Err(StreamError::SourceUnavailable(_))));
}

#[tokio::test]
async fn test_disconnect_releases_source() {
    let (pipeline, counters, _) = pipeline(None, None);
    let session = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::raw("cam2"))
        .await
        .expect("start");
    let (handle, receiver) = session.spawn();
    // the source never yields; only the viewer going away can end the session
    drop(receiver);
    let report = timeout(Duration::from_secs(1), handle)
        .await
        .expect("session should notice the viewer is gone")
        .expect("join");
    assert_eq!(report.state, StreamState::Closed);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_disconnect_mid_stream() {
    let (pipeline, counters, _) = pipeline(None, Some(Duration::from_millis(2)));
    let session = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::raw("cam2"))
        .await
        .expect("start");
    let (handle, mut receiver) = session.spawn();
    for expected in 0..3 {
        let part = receiver.recv().await.expect("part");
        let frame = format!("raw-{expected}");
        assert!(part.ends_with(format!("{frame}\r\n").as_bytes()));
    }
    drop(receiver);
    let report = timeout(Duration::from_secs(1), handle)
        .await
        .expect("session should end")
        .expect("join");
    assert_eq!(report.state, StreamState::Closed);
    assert!(report.emitted >= 3);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_context_is_built_once_and_shared() {
    let (pipeline, counters, contexts) = pipeline(Some(3), None);
    let session = pipeline
        .start(
            &TenantScope::new("acme"),
            &StreamRequest::inference("cam1").with_algorithm("recorder"),
        )
        .await
        .expect("start");
    assert_eq!(session.context().company_id(), "acme");
    assert_eq!(session.context().camera_id(), "cam1");
    assert_eq!(session.context().camera_type(), Some("entrance"));
    assert_eq!(session.context().rois().len(), 2);

    let (handle, receiver) = session.spawn();
    assert_eq!(collect(receiver).await.len(), 3);
    handle.await.expect("join");

    let contexts = contexts.lock().expect("lock");
    assert_eq!(contexts.len(), 3);
    assert!(contexts.iter().all(|c| *c == contexts[0]));
    let context = &contexts[0];
    assert_eq!(context.get("company_id"), Some(&Value::from("acme")));
    assert_eq!(context.get("camera_id"), Some(&Value::from("cam1")));
    assert_eq!(context.get("type"), Some(&Value::from("entrance")));
    let rois = context.get("rois").and_then(Value::as_array).expect("rois");
    assert_eq!(rois.len(), 2);
    assert_eq!(rois[0].get("label"), Some(&Value::from("door")));
    assert_eq!(rois[1].get("label"), None);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_raw_feed_skips_inference() {
    let (pipeline, counters, _) = pipeline(Some(2), None);
    let session = pipeline
        .start(&TenantScope::new("ACME"), &StreamRequest::raw("cam1"))
        .await
        .expect("start");
    assert!(session.invocable().is_none());
    let (handle, receiver) = session.spawn();
    let parts = collect(receiver).await;
    handle.await.expect("join");

    let encoder = MultipartEncoder::default();
    assert_eq!(
        parts,
        vec![encoder.encode_part(b"raw-0"), encoder.encode_part(b"raw-1")]
    );
    assert_eq!(*counters.depths.lock().expect("lock"), vec![4]);
}

#[tokio::test]
async fn test_inference_feed_keeps_newest_frame_only() {
    let (pipeline, counters, _) = pipeline(Some(1), None);
    let session = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::inference("cam2"))
        .await
        .expect("start");
    // cam2 has no algorithm: frames pass through
    assert!(session.invocable().is_none());
    drop(session);
    assert_eq!(*counters.depths.lock().expect("lock"), vec![0]);
}

// real capture task underneath, closes counted
struct CountingSource {
    inner: Box<dyn FrameSource>,
    counters: Arc<Counters>,
}

#[async_trait]
impl FrameSource for CountingSource {
    async fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        self.inner.next_frame().await
    }

    fn close(&mut self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        self.inner.close();
    }
}

struct CountingOpener {
    counters: Arc<Counters>,
}

#[async_trait]
impl SourceOpener for CountingOpener {
    async fn open(
        &self,
        url: &str,
        config: &VideoInConfig,
    ) -> Result<Box<dyn FrameSource>, VideoError> {
        let inner = VideoOpener.open(url, config).await?;
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(CountingSource {
            inner,
            counters: self.counters.clone(),
        }))
    }
}

#[tokio::test]
async fn test_source_failure_ends_session_errored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.mjpeg");
    let encoder = MultipartEncoder::default();
    let mut recording = encoder.encode_part(b"frame-0").to_vec();
    recording.extend_from_slice(b"--frame\r\nContent-Length: banana\r\n\r\n");
    std::fs::write(&path, recording).expect("write");

    let store = MemoryStore::from_json(json!({
        "camera_acme": [
            { "_id": "cam1", "company_id": "acme", "cctv_feed_url": format!("file://{}", path.display()) }
        ],
        "camera_rois": [],
        "inference_algorithms": []
    }))
    .expect("seed");
    let counters = Arc::new(Counters::default());
    let pipeline = Pipeline::new(
        Repository::new(Arc::new(store)),
        Arc::new(PluginRegistry::new()),
        Arc::new(CountingOpener {
            counters: counters.clone(),
        }),
    )
    .with_video_config(
        VideoInConfig::default()
            .with_buffer_depth(4)
            .with_frame_interval(Duration::ZERO),
    );

    let session = pipeline
        .start(&TenantScope::new("acme"), &StreamRequest::raw("cam1"))
        .await
        .expect("start");
    let (handle, receiver) = session.spawn();
    let parts = collect(receiver).await;
    let report = timeout(Duration::from_secs(5), handle)
        .await
        .expect("session should end")
        .expect("join");

    assert_eq!(parts, vec![encoder.encode_part(b"frame-0")]);
    assert_eq!(report.emitted, 1);
    assert_eq!(report.state, StreamState::Errored);
    assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}
