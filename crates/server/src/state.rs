use {
    crate::{ContainerRuntime, ServerConfig},
    algorithm::PluginRegistry,
    std::sync::Arc,
    store::{DocumentStore, Repository, TenantRouter},
    stream::Pipeline,
    video::SourceOpener,
};

/// Shared by all handlers. Holds no per-request state; the tenant of a
/// request is resolved into its own `TenantScope`.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub tenants: TenantRouter,
    pub runtime: Arc<dyn ContainerRuntime>,
    pub app_name: Arc<str>,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        store: Arc<dyn DocumentStore>,
        registry: PluginRegistry,
        opener: Arc<dyn SourceOpener>,
        runtime: Arc<dyn ContainerRuntime>,
    ) -> Self {
        let pipeline = Pipeline::new(Repository::new(store), Arc::new(registry), opener)
            .with_video_config(config.video_config())
            .with_config(config.stream_config());
        Self {
            pipeline,
            tenants: TenantRouter::new(config.default_company()),
            runtime,
            app_name: Arc::from(config.app_name()),
        }
    }

    pub fn repository(&self) -> &Repository {
        self.pipeline.repository()
    }

    pub fn registry(&self) -> &PluginRegistry {
        self.pipeline.registry()
    }
}
