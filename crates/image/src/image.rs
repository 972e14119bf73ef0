use {crate::ImageError, base::Vec2};

/// Packed RGB8 image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() != size.area() * 3 {
            return Err(ImageError::Size(format!(
                "{} bytes do not fill a {} RGB image",
                data.len(),
                size
            )));
        }
        Ok(Self { size, data })
    }

    /// Image filled with a single color.
    pub fn filled(size: Vec2<usize>, color: [u8; 3]) -> Self {
        let data = color.iter().copied().cycle().take(size.area() * 3).collect();
        Self { size, data }
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.size.x || y >= self.size.y {
            return None;
        }
        let i = (y * self.size.x + x) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Set a pixel; coordinates outside the image are ignored.
    pub fn put_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x as usize >= self.size.x || y as usize >= self.size.y {
            return;
        }
        let i = (y as usize * self.size.x + x as usize) * 3;
        self.data[i..i + 3].copy_from_slice(&color);
    }
}
