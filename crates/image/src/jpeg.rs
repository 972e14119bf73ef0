use {
    crate::{Image, ImageError},
    base::Vec2,
    crates_image::ImageEncoder,
};

/// Encode an RGB image as JPEG. `quality` ranges 1-100.
pub fn rgb_to_jpeg(image: &Image, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buffer = Vec::new();
    let encoder =
        crates_image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    encoder
        .write_image(
            &image.data,
            image.size.x as u32,
            image.size.y as u32,
            crates_image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Decode JPEG bytes into an RGB image. Grayscale input is expanded to RGB.
pub fn jpeg_to_rgb(data: &[u8]) -> Result<Image, ImageError> {
    let decoded =
        crates_image::load_from_memory_with_format(data, crates_image::ImageFormat::Jpeg)?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Image::new(Vec2::new(width as usize, height as usize), rgb.into_raw())
}
