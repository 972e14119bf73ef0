use {
    crate::ComError,
    bytes::{BufMut, Bytes, BytesMut},
    tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt},
};

pub const DEFAULT_BOUNDARY: &str = "frame";

pub const MAX_PART_SIZE: usize = 16 * 1024 * 1024; // 16 MB

/// Longest header or delimiter line accepted while looking for a part.
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Wraps encoded images as `multipart/x-mixed-replace` parts.
#[derive(Debug, Clone)]
pub struct MultipartEncoder {
    boundary: String,
}

impl Default for MultipartEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_BOUNDARY)
    }
}

impl MultipartEncoder {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the HTTP `Content-Type` header of the whole response.
    pub fn content_type(&self) -> String {
        format!("multipart/x-mixed-replace; boundary={}", self.boundary)
    }

    /// Encode one JPEG as a complete part: delimiter, headers, payload, trailing CRLF.
    ///
    /// The result is a single buffer so that it goes out as one write.
    pub fn encode_part(&self, jpeg: &[u8]) -> Bytes {
        let header = format!(
            "--{}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
            self.boundary,
            jpeg.len()
        );
        let mut part = BytesMut::with_capacity(header.len() + jpeg.len() + 2);
        part.put_slice(header.as_bytes());
        part.put_slice(jpeg);
        part.put_slice(b"\r\n");
        part.freeze()
    }
}

/// Write one part to an async writer.
pub async fn write_part<W: AsyncWrite + Unpin>(
    writer: &mut W,
    encoder: &MultipartEncoder,
    jpeg: &[u8],
) -> Result<(), ComError> {
    if jpeg.len() > MAX_PART_SIZE {
        return Err(ComError::PartTooLarge(jpeg.len()));
    }
    writer.write_all(&encoder.encode_part(jpeg)).await?;
    writer.flush().await?;
    Ok(())
}

/// One part read back from a multipart stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub content_type: Option<String>,
    pub data: Bytes,
}

async fn read_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ComError> {
    let mut line = Vec::new();
    let n = (&mut *reader)
        .take(MAX_LINE_LENGTH as u64 + 1)
        .read_until(b'\n', &mut line)
        .await?;
    if n == 0 {
        return Err(ComError::ConnectionClosed);
    }
    if line.len() > MAX_LINE_LENGTH {
        return Err(ComError::Malformed(format!(
            "line of {} bytes while looking for a part",
            line.len()
        )));
    }
    while matches!(line.last(), Some(b'\n' | b'\r')) {
        line.pop();
    }
    Ok(line)
}

// no Content-Length: the JPEG ends at its EOI marker
async fn read_until_eoi<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Bytes, ComError> {
    let mut data = Vec::new();
    let mut limited = (&mut *reader).take(MAX_PART_SIZE as u64 + 1);
    loop {
        let n = limited.read_until(0xD9, &mut data).await?;
        if n == 0 {
            return Err(ComError::ConnectionClosed);
        }
        if data.len() > MAX_PART_SIZE {
            return Err(ComError::PartTooLarge(data.len()));
        }
        if data.ends_with(&[0xFF, 0xD9]) {
            return Ok(Bytes::from(data));
        }
    }
}

/// Read the next part from a multipart stream.
///
/// Skips preamble and blank lines up to the next `--boundary` line, parses the
/// part headers, then reads `Content-Length` bytes. Parts without a length are
/// read up to the JPEG end-of-image marker.
///
/// Returns `ComError::ConnectionClosed` at end of input or on the closing delimiter.
/// Returns `ComError::PartTooLarge` if a part exceeds `MAX_PART_SIZE`.
pub async fn read_part<R: AsyncBufRead + Unpin>(reader: &mut R) -> Result<Part, ComError> {
    loop {
        let line = read_line(reader).await?;
        if line.starts_with(b"--") {
            if line.ends_with(b"--") && line.len() > 2 {
                return Err(ComError::ConnectionClosed);
            }
            break;
        }
    }

    let mut content_type = None;
    let mut content_length = None;
    loop {
        let line = read_line(reader).await?;
        if line.is_empty() {
            break;
        }
        let line = String::from_utf8_lossy(&line);
        let Some((name, value)) = line.split_once(':') else {
            return Err(ComError::Malformed(format!("bad header line: {line}")));
        };
        let value = value.trim();
        match name.trim().to_ascii_lowercase().as_str() {
            "content-type" => content_type = Some(value.to_string()),
            "content-length" => {
                let len = value
                    .parse::<usize>()
                    .map_err(|_| ComError::Malformed(format!("bad content length: {value}")))?;
                content_length = Some(len);
            }
            _ => {}
        }
    }

    let data = match content_length {
        Some(len) if len > MAX_PART_SIZE => return Err(ComError::PartTooLarge(len)),
        Some(len) => {
            let mut data = vec![0u8; len];
            reader.read_exact(&mut data).await?;
            Bytes::from(data)
        }
        None => read_until_eoi(reader).await?,
    };

    Ok(Part { content_type, data })
}

/// Extract the boundary parameter from a multipart `Content-Type` value.
pub fn boundary_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("boundary")
            .then(|| value.trim().trim_matches('"').to_string())
    })
}
