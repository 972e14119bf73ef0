use crate::Image;

pub type Rgb = [u8; 3];

/// Draw a one pixel wide line (Bresenham). Parts outside the image are clipped.
pub fn draw_line(image: &mut Image, from: (f32, f32), to: (f32, f32), color: Rgb) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        image.put_pixel(x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Draw the closed outline of a polygon.
pub fn draw_polygon(image: &mut Image, points: &[(f32, f32)], color: Rgb) {
    match points {
        [] => {}
        [only] => draw_line(image, *only, *only, color),
        _ => {
            for pair in points.windows(2) {
                draw_line(image, pair[0], pair[1], color);
            }
            draw_line(image, points[points.len() - 1], points[0], color);
        }
    }
}
