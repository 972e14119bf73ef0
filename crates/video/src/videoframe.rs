use bytes::Bytes;

/// One captured frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Position in capture order within one session. Increases monotonically;
    /// gaps mean frames were dropped by the buffering policy.
    pub sequence: u64,
    /// JPEG-encoded image.
    pub data: Bytes,
}
