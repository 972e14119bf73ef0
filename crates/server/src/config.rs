use {
    log::LevelFilter,
    std::{fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr},
    stream::StreamConfig,
    video::VideoInConfig,
};

/// Service settings, read from the environment.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    app_name: String,
    bind_addr: SocketAddr,
    data_file: Option<PathBuf>,
    default_company: String,
    stream_buffer_depth: usize,
    stream_channel_capacity: usize,
    max_consecutive_failures: u32,
    jpeg_quality: u8,
    log_level: LevelFilter,
    log_dir: Option<PathBuf>,
    warnings: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            app_name: "inference-api".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            data_file: None,
            default_company: "si31793".to_string(),
            stream_buffer_depth: 0,
            stream_channel_capacity: 2,
            max_consecutive_failures: 25,
            jpeg_quality: 80,
            log_level: LevelFilter::Info,
            log_dir: None,
            warnings: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values keep their default and
    /// are reported through `warnings`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut warnings = Vec::new();
        let w = &mut warnings;
        let mut config = Self {
            app_name: read_var(&lookup, w, "APP_NAME", defaults.app_name),
            bind_addr: read_var(&lookup, w, "BIND_ADDR", defaults.bind_addr),
            data_file: None,
            default_company: read_var(&lookup, w, "DEFAULT_COMPANY", defaults.default_company),
            stream_buffer_depth: read_var(
                &lookup,
                w,
                "STREAM_BUFFER_DEPTH",
                defaults.stream_buffer_depth,
            ),
            stream_channel_capacity: read_var(
                &lookup,
                w,
                "STREAM_CHANNEL_CAPACITY",
                defaults.stream_channel_capacity,
            )
            .max(1),
            max_consecutive_failures: read_var(
                &lookup,
                w,
                "MAX_CONSECUTIVE_FAILURES",
                defaults.max_consecutive_failures,
            ),
            jpeg_quality: read_var(&lookup, w, "JPEG_QUALITY", defaults.jpeg_quality).clamp(1, 100),
            log_level: read_var(&lookup, w, "LOG_LEVEL", defaults.log_level),
            log_dir: None,
            warnings: Vec::new(),
        };
        config.data_file = lookup("DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        config.log_dir = lookup("LOG_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        config.warnings = warnings;
        config
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn with_data_file(mut self, data_file: impl Into<PathBuf>) -> Self {
        self.data_file = Some(data_file.into());
        self
    }

    pub fn with_default_company(mut self, default_company: impl Into<String>) -> Self {
        self.default_company = default_company.into();
        self
    }

    pub fn with_stream_buffer_depth(mut self, stream_buffer_depth: usize) -> Self {
        self.stream_buffer_depth = stream_buffer_depth;
        self
    }

    pub fn with_stream_channel_capacity(mut self, stream_channel_capacity: usize) -> Self {
        self.stream_channel_capacity = stream_channel_capacity.max(1);
        self
    }

    pub fn with_max_consecutive_failures(mut self, max_consecutive_failures: u32) -> Self {
        self.max_consecutive_failures = max_consecutive_failures;
        self
    }

    pub fn with_jpeg_quality(mut self, jpeg_quality: u8) -> Self {
        self.jpeg_quality = jpeg_quality.clamp(1, 100);
        self
    }

    pub fn with_log_level(mut self, log_level: LevelFilter) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = Some(log_dir.into());
        self
    }

    // Getters
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    pub fn data_file(&self) -> Option<&PathBuf> {
        self.data_file.as_ref()
    }

    pub fn default_company(&self) -> &str {
        &self.default_company
    }

    pub fn stream_buffer_depth(&self) -> usize {
        self.stream_buffer_depth
    }

    pub fn stream_channel_capacity(&self) -> usize {
        self.stream_channel_capacity
    }

    pub fn max_consecutive_failures(&self) -> u32 {
        self.max_consecutive_failures
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn log_dir(&self) -> Option<&PathBuf> {
        self.log_dir.as_ref()
    }

    /// Problems found while reading the environment, to be logged once a
    /// logger is installed.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Capture settings for raw feeds.
    pub fn video_config(&self) -> VideoInConfig {
        VideoInConfig::default().with_buffer_depth(self.stream_buffer_depth)
    }

    pub fn stream_config(&self) -> StreamConfig {
        StreamConfig::default()
            .with_channel_capacity(self.stream_channel_capacity)
            .with_max_consecutive_failures(self.max_consecutive_failures)
    }
}

fn read_var<T: FromStr + Display>(
    lookup: &impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
    key: &str,
    default: T,
) -> T {
    let Some(value) = lookup(key) else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) if !value.trim().is_empty() => parsed,
        _ => {
            warnings.push(format!("{key}={value:?} is invalid, using {default}"));
            default
        }
    }
}
