use std::time::Duration;

/// Capture settings for a frame source.
#[derive(Clone, Debug)]
pub struct VideoInConfig {
    buffer_depth: usize,
    frame_interval: Duration,
    reconnect_attempts: u32,
    connect_timeout: Duration,
}

impl Default for VideoInConfig {
    fn default() -> Self {
        Self {
            buffer_depth: 4,
            frame_interval: Duration::from_millis(40),
            reconnect_attempts: 3,
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl VideoInConfig {
    /// Set how many captured frames may wait for the consumer.
    ///
    /// Zero keeps only the newest frame and drops anything not yet consumed.
    pub fn with_buffer_depth(mut self, buffer_depth: usize) -> Self {
        self.buffer_depth = buffer_depth;
        self
    }

    /// Set the pacing between frames of file-based sources.
    pub fn with_frame_interval(mut self, frame_interval: Duration) -> Self {
        self.frame_interval = frame_interval;
        self
    }

    /// Set how often a live source is reopened after a capture failure.
    pub fn with_reconnect_attempts(mut self, reconnect_attempts: u32) -> Self {
        self.reconnect_attempts = reconnect_attempts;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    // Getters
    pub fn buffer_depth(&self) -> usize {
        self.buffer_depth
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn reconnect_attempts(&self) -> u32 {
        self.reconnect_attempts
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}
