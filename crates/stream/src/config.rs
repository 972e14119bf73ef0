/// Settings shared by all stream sessions.
#[derive(Clone, Debug)]
pub struct StreamConfig {
    channel_capacity: usize,
    max_consecutive_failures: u32,
    default_action: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 2,
            max_consecutive_failures: 25,
            default_action: "annotate".to_string(),
        }
    }
}

impl StreamConfig {
    /// Set how many encoded parts may wait for the viewer's connection.
    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity.max(1);
        self
    }

    /// Set how many inference failures in a row are tolerated before the
    /// session gives up.
    pub fn with_max_consecutive_failures(mut self, max_consecutive_failures: u32) -> Self {
        self.max_consecutive_failures = max_consecutive_failures;
        self
    }

    /// Set the action invoked when a request names none.
    pub fn with_default_action(mut self, default_action: impl Into<String>) -> Self {
        self.default_action = default_action.into();
        self
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    pub fn max_consecutive_failures(&self) -> u32 {
        self.max_consecutive_failures
    }

    pub fn default_action(&self) -> &str {
        &self.default_action
    }
}
