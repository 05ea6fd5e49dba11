/// 8x8 stipple patterns and light quantization
use nalgebra::Vector3;

/// One row per byte, most significant bit leftmost. A set bit is a light pixel.
pub type Pattern = [u8; 8];

/// Highest pattern index (solid light)
pub const MAX_LEVEL: usize = 32;

/// Offset from the fill level to the darker edge level
pub const WIRE_DARKEN: usize = 16;

/// Ordered-dither ramp from solid dark (0) to solid light (32)
pub const PATTERNS: [Pattern; MAX_LEVEL + 1] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    [0x80, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00],
    [0x88, 0x00, 0x00, 0x00, 0x88, 0x00, 0x00, 0x00],
    [0x88, 0x00, 0x20, 0x00, 0x88, 0x00, 0x02, 0x00],
    [0x88, 0x00, 0x22, 0x00, 0x88, 0x00, 0x22, 0x00],
    [0xa8, 0x00, 0x22, 0x00, 0x8a, 0x00, 0x22, 0x00],
    [0xaa, 0x00, 0x22, 0x00, 0xaa, 0x00, 0x22, 0x00],
    [0xaa, 0x00, 0xa2, 0x00, 0xaa, 0x00, 0x2a, 0x00],
    [0xaa, 0x00, 0xaa, 0x00, 0xaa, 0x00, 0xaa, 0x00],
    [0xaa, 0x40, 0xaa, 0x00, 0xaa, 0x04, 0xaa, 0x00],
    [0xaa, 0x44, 0xaa, 0x00, 0xaa, 0x44, 0xaa, 0x00],
    [0xaa, 0x44, 0xaa, 0x10, 0xaa, 0x44, 0xaa, 0x01],
    [0xaa, 0x44, 0xaa, 0x11, 0xaa, 0x44, 0xaa, 0x11],
    [0xaa, 0x54, 0xaa, 0x11, 0xaa, 0x45, 0xaa, 0x11],
    [0xaa, 0x55, 0xaa, 0x11, 0xaa, 0x55, 0xaa, 0x11],
    [0xaa, 0x55, 0xaa, 0x51, 0xaa, 0x55, 0xaa, 0x15],
    [0xaa, 0x55, 0xaa, 0x55, 0xaa, 0x55, 0xaa, 0x55],
    [0xba, 0x55, 0xaa, 0x55, 0xab, 0x55, 0xaa, 0x55],
    [0xbb, 0x55, 0xaa, 0x55, 0xbb, 0x55, 0xaa, 0x55],
    [0xbb, 0x55, 0xea, 0x55, 0xbb, 0x55, 0xae, 0x55],
    [0xbb, 0x55, 0xee, 0x55, 0xbb, 0x55, 0xee, 0x55],
    [0xfb, 0x55, 0xee, 0x55, 0xbf, 0x55, 0xee, 0x55],
    [0xff, 0x55, 0xee, 0x55, 0xff, 0x55, 0xee, 0x55],
    [0xff, 0x55, 0xfe, 0x55, 0xff, 0x55, 0xef, 0x55],
    [0xff, 0x55, 0xff, 0x55, 0xff, 0x55, 0xff, 0x55],
    [0xff, 0x55, 0xff, 0xd5, 0xff, 0x55, 0xff, 0x5d],
    [0xff, 0x55, 0xff, 0xdd, 0xff, 0x55, 0xff, 0xdd],
    [0xff, 0x75, 0xff, 0xdd, 0xff, 0x57, 0xff, 0xdd],
    [0xff, 0x77, 0xff, 0xdd, 0xff, 0x77, 0xff, 0xdd],
    [0xff, 0x77, 0xff, 0xfd, 0xff, 0x77, 0xff, 0xdf],
    [0xff, 0x77, 0xff, 0xff, 0xff, 0x77, 0xff, 0xff],
    [0xff, 0xf7, 0xff, 0xff, 0xff, 0x7f, 0xff, 0xff],
    [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
];

/// Whether the pattern marks pixel (x, y) light
#[inline]
pub fn pattern_bit(pattern: &Pattern, x: i32, y: i32) -> bool {
    let row = pattern[(y & 7) as usize];
    (row >> (7 - (x & 7))) & 1 == 1
}

/// Shade value in [0, 1] for a face: 0 when the normal matches the light, 1 when opposed
#[inline]
pub fn shade(normal: &Vector3<f32>, light: &Vector3<f32>) -> f32 {
    0.5 - 0.5 * normal.dot(light)
}

/// Quantize a shade value to a pattern index, truncating and clamping to [0, 32]
pub fn level_for_shade(v: f32) -> usize {
    let vi = (32.99 * v) as i32;
    vi.clamp(0, MAX_LEVEL as i32) as usize
}

/// Pattern index used to fill a face with the given normal
pub fn fill_level(normal: &Vector3<f32>, light: &Vector3<f32>) -> usize {
    level_for_shade(shade(normal, light))
}

/// Darker level used for a face's edges
pub fn wire_level(fill_level: usize) -> usize {
    fill_level.saturating_sub(WIRE_DARKEN)
}
