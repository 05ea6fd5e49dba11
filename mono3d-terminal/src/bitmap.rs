/// 1-bit-per-pixel surface and stipple rasterization
use mono3d_core::pattern::{pattern_bit, Pattern};
use mono3d_core::{Point2, Rasterizer};

/// Packed 1bpp bitmap, most significant bit leftmost. A set bit is a light pixel.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: usize,
    height: usize,
    row_stride: usize,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let row_stride = width.div_ceil(8);
        Self {
            width,
            height,
            row_stride,
            data: vec![0; row_stride * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Fill every pixel light or dark
    pub fn clear(&mut self, light: bool) {
        let byte = if light { 0xff } else { 0x00 };
        self.data.fill(byte);
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let byte = self.data[y * self.row_stride + x / 8];
        (byte >> (7 - (x % 8))) & 1 == 1
    }

    pub fn set(&mut self, x: usize, y: usize, light: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let byte = &mut self.data[y * self.row_stride + x / 8];
        let mask = 0x80 >> (x % 8);
        if light {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
    }

    /// Count of light pixels
    pub fn light_pixels(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.get(x, y))
            .count()
    }

    /// Write the pattern's bit for (x, y), ignoring pixels off the surface
    fn plot(&mut self, x: i32, y: i32, pattern: &Pattern) {
        if x < 0 || y < 0 {
            return;
        }
        self.set(x as usize, y as usize, pattern_bit(pattern, x, y));
    }
}

impl Rasterizer for Bitmap {
    fn fill_triangle(&mut self, p1: Point2<f32>, p2: Point2<f32>, p3: Point2<f32>, pattern: &Pattern) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box
        let min_x = p1.x.min(p2.x).min(p3.x).floor() as i32;
        let max_x = p1.x.max(p2.x).max(p3.x).ceil() as i32;
        let min_y = p1.y.min(p2.y).min(p3.y).floor() as i32;
        let max_y = p1.y.max(p2.y).max(p3.y).ceil() as i32;

        // Clip to bitmap bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(p1, p2, p3, p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, pattern);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, p1: Point2<f32>, p2: Point2<f32>, width: u32, pattern: &Pattern) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Keep the walk on (or one brush width around) the surface
        let reach = width.max(1) as f64;
        let bounds = (-reach, -reach, self.width as f64 - 1.0 + reach, self.height as f64 - 1.0 + reach);
        let Some((a, b)) = clip_segment(p1, p2, bounds) else {
            return;
        };

        let (mut x0, mut y0) = (a.0.round() as i32, a.1.round() as i32);
        let (x1, y1) = (b.0.round() as i32, b.1.round() as i32);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let width = width.max(1) as i32;
        let lo = -(width - 1) / 2;
        let hi = lo + width;

        loop {
            for by in lo..hi {
                for bx in lo..hi {
                    self.plot(x0 + bx, y0 + by, pattern);
                }
            }

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
}

/// Liang-Barsky clip of `p1..p2` against `(min_x, min_y, max_x, max_y)`.
///
/// Works in f64 so far-off endpoints keep sub-pixel precision after clipping.
fn clip_segment(
    p1: Point2<f32>,
    p2: Point2<f32>,
    (min_x, min_y, max_x, max_y): (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if !(p1.x.is_finite() && p1.y.is_finite() && p2.x.is_finite() && p2.y.is_finite()) {
        return None;
    }

    let (x0, y0) = (p1.x as f64, p1.y as f64);
    let (dx, dy) = (p2.x as f64 - x0, p2.y as f64 - y0);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [(-dx, x0 - min_x), (dx, max_x - x0), (-dy, y0 - min_y), (dy, max_y - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    Some(((x0 + t0 * dx, y0 + t0 * dy), (x0 + t1 * dx, y0 + t1 * dy)))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    p: Point2<f32>,
) -> Option<(f32, f32, f32)> {
    let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.y - v2.y) * (p.x - v2.x) + (v2.x - v1.x) * (p.y - v2.y)) / denom;
    let w1 = ((v2.y - v0.y) * (p.x - v2.x) + (v0.x - v2.x) * (p.y - v2.y)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
