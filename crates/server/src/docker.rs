use {
    async_trait::async_trait,
    std::{fmt, process::Output},
    tokio::process::Command,
};

#[derive(Debug)]
pub enum RuntimeError {
    Spawn(std::io::Error),
    Command { command: String, stderr: String },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Spawn(err) => write!(f, "cannot run container runtime: {err}"),
            RuntimeError::Command { command, stderr } => write!(f, "{command} failed: {stderr}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::Spawn(err)
    }
}

/// Lifecycle of the containers running inference workloads.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Run `image` detached. Returns the new container's id.
    async fn run(&self, image: &str) -> Result<String, RuntimeError>;

    /// Stop a container. Returns its full id.
    async fn stop(&self, container: &str) -> Result<String, RuntimeError>;

    /// Restart a container. Returns its full id.
    async fn restart(&self, container: &str) -> Result<String, RuntimeError>;

    /// Look up an image. Returns its id.
    async fn image(&self, image: &str) -> Result<String, RuntimeError>;
}

/// Drives the `docker` command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn docker(&self, args: &[&str]) -> Result<String, RuntimeError> {
        log::debug!("docker: {} {}", self.binary, args.join(" "));
        let Output {
            status,
            stdout,
            stderr,
        } = Command::new(&self.binary).args(args).output().await?;
        if !status.success() {
            return Err(RuntimeError::Command {
                command: format!("{} {}", self.binary, args.join(" ")),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }

    async fn container_id(&self, container: &str) -> Result<String, RuntimeError> {
        self.docker(&["container", "inspect", "--format", "{{.Id}}", container])
            .await
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn run(&self, image: &str) -> Result<String, RuntimeError> {
        self.docker(&["run", "--detach", image]).await
    }

    async fn stop(&self, container: &str) -> Result<String, RuntimeError> {
        let id = self.container_id(container).await?;
        self.docker(&["stop", &id]).await?;
        Ok(id)
    }

    async fn restart(&self, container: &str) -> Result<String, RuntimeError> {
        let id = self.container_id(container).await?;
        self.docker(&["restart", &id]).await?;
        Ok(id)
    }

    async fn image(&self, image: &str) -> Result<String, RuntimeError> {
        self.docker(&["image", "inspect", "--format", "{{.Id}}", image])
            .await
    }
}
