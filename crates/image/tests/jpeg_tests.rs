use {
    base::Vec2,
    image::{Image, jpeg_to_rgb, rgb_to_jpeg},
};

fn gradient(size: Vec2<usize>) -> Image {
    let data = (0..size.area() * 3).map(|v| (v % 256) as u8).collect();
    Image::new(size, data).expect("valid size")
}

#[test]
fn test_rgb_to_jpeg_has_soi_marker() {
    let jpeg = rgb_to_jpeg(&gradient(Vec2::new(4, 4)), 90).expect("encode");
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
}

#[test]
fn test_quality_affects_size() {
    let image = gradient(Vec2::new(16, 16));
    let low = rgb_to_jpeg(&image, 10).expect("encode");
    let high = rgb_to_jpeg(&image, 100).expect("encode");
    assert!(low.len() < high.len());
}

#[test]
fn test_jpeg_to_rgb_restores_size() {
    let size = Vec2::new(8, 6);
    let jpeg = rgb_to_jpeg(&Image::filled(size, [200, 10, 10]), 95).expect("encode");
    let decoded = jpeg_to_rgb(&jpeg).expect("decode");
    assert_eq!(decoded.size, size);
    assert_eq!(decoded.data.len(), 8 * 6 * 3);
    let [r, g, b] = decoded.pixel(3, 3).expect("inside");
    assert!(r > 150 && g < 60 && b < 60);
}

#[test]
fn test_jpeg_to_rgb_rejects_garbage() {
    assert!(jpeg_to_rgb(b"definitely not a jpeg").is_err());
}

#[test]
fn test_image_new_rejects_short_buffer() {
    assert!(Image::new(Vec2::new(2, 2), vec![0; 11]).is_err());
}
