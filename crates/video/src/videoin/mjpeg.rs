use {
    crate::*,
    bytes::Bytes,
    com::{ComError, boundary_from_content_type, read_part},
    futures_util::{Stream, StreamExt},
    std::pin::Pin,
    tokio_util::io::StreamReader,
};

type BodyStream = Pin<Box<dyn Stream<Item = std::io::Result<Bytes>> + Send>>;

/// MJPEG-over-HTTP camera (`multipart/x-mixed-replace` response body).
pub(crate) struct MjpegDevice {
    url: String,
    client: reqwest::Client,
    reader: Option<StreamReader<BodyStream, Bytes>>,
}

impl MjpegDevice {
    pub fn new(url: &str, config: &VideoInConfig) -> Result<Self, VideoError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()
            .map_err(|e| VideoError::SourceUnavailable(e.to_string()))?;
        Ok(Self {
            url: url.to_string(),
            client,
            reader: None,
        })
    }

    pub async fn open(&mut self) -> Result<(), VideoError> {
        self.reader.take();

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| VideoError::SourceUnavailable(format!("{}: {}", self.url, e)))?;
        if !response.status().is_success() {
            return Err(VideoError::SourceUnavailable(format!(
                "{} answered {}",
                self.url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        match boundary_from_content_type(content_type) {
            Some(boundary) => log::debug!("mjpeg: {} uses boundary {}", self.url, boundary),
            None => log::warn!(
                "mjpeg: {} sent content type {:?}, reading parts anyway",
                self.url,
                content_type
            ),
        }

        let body: BodyStream = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(std::io::Error::other)),
        );
        self.reader = Some(StreamReader::new(body));
        Ok(())
    }

    pub async fn capture(&mut self) -> Result<Option<Bytes>, VideoError> {
        let Some(reader) = self.reader.as_mut() else {
            return Err(VideoError::Stream(format!("{} is not open", self.url)));
        };
        match read_part(reader).await {
            Ok(part) => Ok(Some(part.data)),
            Err(ComError::ConnectionClosed) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    pub fn close(&mut self) {
        self.reader.take();
    }
}
