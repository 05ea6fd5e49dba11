/// Rasterization interface the scene draws through
use nalgebra::Point2;

use crate::pattern::Pattern;

/// Paints stippled triangles and lines onto a 1-bit surface.
///
/// Implementors own the bitmap and its row stride. Points are in screen
/// pixels; anything outside the surface is the implementor's to clip.
pub trait Rasterizer {
    /// Fill the triangle `p1, p2, p3` with a repeating 8x8 pattern
    fn fill_triangle(&mut self, p1: Point2<f32>, p2: Point2<f32>, p3: Point2<f32>, pattern: &Pattern);

    /// Stroke the segment `p1 -> p2`, `width` pixels wide
    fn draw_line(&mut self, p1: Point2<f32>, p2: Point2<f32>, width: u32, pattern: &Pattern);
}

impl<R: Rasterizer + ?Sized> Rasterizer for &mut R {
    fn fill_triangle(&mut self, p1: Point2<f32>, p2: Point2<f32>, p3: Point2<f32>, pattern: &Pattern) {
        (**self).fill_triangle(p1, p2, p3, pattern)
    }

    fn draw_line(&mut self, p1: Point2<f32>, p2: Point2<f32>, width: u32, pattern: &Pattern) {
        (**self).draw_line(p1, p2, width, pattern)
    }
}
