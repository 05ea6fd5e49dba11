/// Scene state and the per-shape draw pipeline
use std::ops::BitOr;

use nalgebra::{Point2, Vector3};
use tracing::{debug, info_span, trace, warn};

use crate::config::{FaceOrdering, SceneConfig, Viewport};
use crate::error::Result;
use crate::geometry::{triangle_normal, Shape};
use crate::pattern::{fill_level, wire_level, PATTERNS};
use crate::projection::{Camera, Projection};
use crate::radix::{float_flip, radix_sort_keys_u32, radix_sort_u32};
use crate::raster::Rasterizer;
use crate::scratch::GrowBuffer;
use crate::transform::Xform;

/// Faces distinguishable by the packed sort key
pub const PACKED_FACE_LIMIT: usize = 256;

const FACE_INDEX_MASK: u32 = 0xFF;

/// Which passes to run for each visible face. Combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStyle {
    pub filled: bool,
    pub wireframe: bool,
}

impl RenderStyle {
    pub const NONE: RenderStyle = RenderStyle {
        filled: false,
        wireframe: false,
    };
    pub const FILLED: RenderStyle = RenderStyle {
        filled: true,
        wireframe: false,
    };
    pub const WIREFRAME: RenderStyle = RenderStyle {
        filled: false,
        wireframe: true,
    };
}

impl BitOr for RenderStyle {
    type Output = RenderStyle;

    fn bitor(self, rhs: RenderStyle) -> RenderStyle {
        RenderStyle {
            filled: self.filled || rhs.filled,
            wireframe: self.wireframe || rhs.wireframe,
        }
    }
}

/// What happened to a single face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceOutcome {
    /// A vertex sits at or behind the camera
    DepthRejected,
    /// Entirely off one side of the viewport
    OutOfBounds,
    /// Winds the wrong way on screen
    BackFacing,
    Drawn,
}

/// Per-draw counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawStats {
    pub faces: usize,
    pub drawn: usize,
    pub depth_rejected: usize,
    pub bounds_rejected: usize,
    pub backface_culled: usize,
}

impl DrawStats {
    fn record(&mut self, outcome: FaceOutcome) {
        match outcome {
            FaceOutcome::DepthRejected => self.depth_rejected += 1,
            FaceOutcome::OutOfBounds => self.bounds_rejected += 1,
            FaceOutcome::BackFacing => self.backface_culled += 1,
            FaceOutcome::Drawn => self.drawn += 1,
        }
    }
}

/// Everything a face needs besides its own geometry
#[derive(Debug, Clone, Copy)]
pub struct FaceContext {
    pub light: Vector3<f32>,
    pub viewport: Viewport,
    pub style: RenderStyle,
}

/// Pack a sortable depth key with a face index in its low byte
#[inline]
pub fn pack_face_key(depth_key: u32, face: usize) -> u32 {
    (depth_key & !FACE_INDEX_MASK) | (face as u32 & FACE_INDEX_MASK)
}

/// Sortable key for a face: larger summed camera-space z sorts first
#[inline]
pub fn depth_key(p1: &Vector3<f32>, p2: &Vector3<f32>, p3: &Vector3<f32>) -> u32 {
    let z = -(p1.z + p2.z + p3.z);
    float_flip(z.to_bits())
}

/// Cull, light and rasterize one face.
///
/// `p1..p3` hold screen x/y and camera-space z, as left by projection.
/// `normal` is the face normal in camera space.
pub fn draw_face<R: Rasterizer + ?Sized>(
    raster: &mut R,
    p1: &Vector3<f32>,
    p2: &Vector3<f32>,
    p3: &Vector3<f32>,
    normal: &Vector3<f32>,
    ctx: &FaceContext,
) -> FaceOutcome {
    // Vertices at or behind the camera were never projected
    if p1.z <= 0.0 || p2.z <= 0.0 || p3.z <= 0.0 {
        return FaceOutcome::DepthRejected;
    }

    let width = ctx.viewport.width as f32;
    let height = ctx.viewport.height as f32;
    if Viewport::all_outside(p1.x, p2.x, p3.x, width)
        || Viewport::all_outside(p1.y, p2.y, p3.y, height)
    {
        return FaceOutcome::OutOfBounds;
    }

    let dx21 = p2.x - p1.x;
    let dy31 = p3.y - p1.y;
    let dx31 = p3.x - p1.x;
    let dy21 = p2.y - p1.y;
    if dx21 * dy31 - dy21 * dx31 >= 0.0 {
        return FaceOutcome::BackFacing;
    }

    let level = fill_level(normal, &ctx.light);
    let (s1, s2, s3) = (screen(p1), screen(p2), screen(p3));

    if ctx.style.filled {
        raster.fill_triangle(s1, s2, s3, &PATTERNS[level]);
    }

    if ctx.style.wireframe {
        let pattern = &PATTERNS[wire_level(level)];
        raster.draw_line(s1, s2, 1, pattern);
        raster.draw_line(s2, s3, 1, pattern);
        raster.draw_line(s3, s1, 1, pattern);
    }

    FaceOutcome::Drawn
}

#[inline]
fn screen(p: &Vector3<f32>) -> Point2<f32> {
    Point2::new(p.x, p.y)
}

/// Camera, light and scratch state for one render stream.
///
/// Scratch buffers grow to the largest shape drawn and are reused; drawing
/// takes `&mut self`, so only one draw can use them at a time.
pub struct Scene {
    config: SceneConfig,
    camera: Camera,
    light: Vector3<f32>,
    center_x: f32,
    center_y: f32,
    points: GrowBuffer<Vector3<f32>>,
    normals: GrowBuffer<Vector3<f32>>,
    order: GrowBuffer<u32>,
    order_temp: GrowBuffer<u32>,
    face_ids: GrowBuffer<u32>,
    face_ids_temp: GrowBuffer<u32>,
}

impl Scene {
    pub fn new() -> Self {
        Self::build(SceneConfig::default())
    }

    pub fn with_config(config: SceneConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: SceneConfig) -> Self {
        let [lx, ly, lz] = config.light;
        let [cx, cy] = config.center;
        let reference_height = config.viewport.height as f32;

        Self {
            camera: Camera::look_at(
                Vector3::zeros(),
                Vector3::new(0.0, 0.0, 1.0),
                1.0,
                Vector3::new(0.0, 1.0, 0.0),
                reference_height,
            ),
            light: Vector3::new(lx, ly, lz),
            center_x: cx,
            center_y: cy,
            points: GrowBuffer::new("points", Vector3::zeros()),
            normals: GrowBuffer::new("face_normals", Vector3::zeros()),
            order: GrowBuffer::new("order", 0),
            order_temp: GrowBuffer::new("order_temp", 0),
            face_ids: GrowBuffer::new("face_ids", 0),
            face_ids_temp: GrowBuffer::new("face_ids_temp", 0),
            config,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Aim the camera. `scale` multiplies the viewport height to give the projection scale.
    pub fn set_camera(&mut self, origin: Vector3<f32>, look_at: Vector3<f32>, scale: f32, up: Vector3<f32>) {
        self.camera = Camera::look_at(origin, look_at, scale, up, self.config.viewport.height as f32);
        debug!(?origin, ?look_at, scale, "camera set");
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Set the light direction. Expected to be unit length; not renormalized.
    pub fn set_global_light(&mut self, light: Vector3<f32>) {
        self.light = light;
        debug!(?light, "light set");
    }

    pub fn light(&self) -> Vector3<f32> {
        self.light
    }

    pub fn set_center(&mut self, x: f32, y: f32) {
        self.center_x = x;
        self.center_y = y;
        debug!(x, y, "center set");
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    pub fn projection(&self) -> Projection {
        Projection {
            scale: self.camera.scale,
            center_x: self.center_x,
            center_y: self.center_y,
            horizontal_bias: self.config.horizontal_bias,
        }
    }

    /// Current scratch sizes: (points, faces)
    pub fn scratch_capacity(&self) -> (usize, usize) {
        (self.points.capacity(), self.order.capacity())
    }

    /// Transform, sort and draw `shape` back to front.
    ///
    /// Points go through `placement` first, then the camera.
    pub fn draw_shape<R: Rasterizer + ?Sized>(
        &mut self,
        raster: &mut R,
        shape: &Shape,
        placement: &Xform,
        style: RenderStyle,
    ) -> DrawStats {
        let n_points = shape.vertex_count();
        let n_faces = shape.face_count();
        let _span = info_span!("draw_shape", points = n_points, faces = n_faces).entered();

        let ordering = self.config.face_ordering;
        if ordering == FaceOrdering::PackedKey && n_faces > PACKED_FACE_LIMIT {
            warn!(
                faces = n_faces,
                limit = PACKED_FACE_LIMIT,
                "face indices alias past the packed key limit"
            );
        }

        self.points.reserve(n_points);
        self.normals.reserve(n_faces);
        self.order.reserve(n_faces);
        self.order_temp.reserve(n_faces);
        if ordering == FaceOrdering::KeyValue {
            self.face_ids.reserve(n_faces);
            self.face_ids_temp.reserve(n_faces);
        }

        let projection = self.projection();
        let to_camera = placement.then(&self.camera.transform);

        let points = &mut self.points.as_mut_slice()[..n_points];
        for (dst, src) in points.iter_mut().zip(shape.points()) {
            *dst = to_camera.transform_point(src);
        }

        let normals = &mut self.normals.as_mut_slice()[..n_faces];
        let order = &mut self.order.as_mut_slice()[..n_faces];
        for (i, face) in shape.faces().iter().enumerate() {
            let [a, b, c] = face.map(|index| points[index as usize]);
            normals[i] = triangle_normal(&a, &b, &c);

            let key = depth_key(&a, &b, &c);
            order[i] = match ordering {
                FaceOrdering::PackedKey => pack_face_key(key, i),
                FaceOrdering::KeyValue => key,
            };
        }

        for p in points.iter_mut() {
            projection.project_in_place(p);
        }

        let order_temp = &mut self.order_temp.as_mut_slice()[..n_faces];
        let (sorted, mask) = match ordering {
            FaceOrdering::PackedKey => {
                let which = radix_sort_keys_u32(order, order_temp);
                (which.select(order, order_temp), FACE_INDEX_MASK)
            }
            FaceOrdering::KeyValue => {
                let ids = &mut self.face_ids.as_mut_slice()[..n_faces];
                for (i, id) in ids.iter_mut().enumerate() {
                    *id = i as u32;
                }
                let ids_temp = &mut self.face_ids_temp.as_mut_slice()[..n_faces];
                let which = radix_sort_u32(order, order_temp, ids, ids_temp);
                (which.select(ids, ids_temp), u32::MAX)
            }
        };

        let ctx = FaceContext {
            light: self.light,
            viewport: self.config.viewport,
            style,
        };
        let mut stats = DrawStats {
            faces: n_faces,
            ..DrawStats::default()
        };

        for &entry in sorted {
            let fi = (entry & mask) as usize;
            let [i0, i1, i2] = shape.faces()[fi];
            let outcome = draw_face(
                raster,
                &points[i0 as usize],
                &points[i1 as usize],
                &points[i2 as usize],
                &normals[fi],
                &ctx,
            );
            stats.record(outcome);
        }

        trace!(
            faces = stats.faces,
            drawn = stats.drawn,
            depth_rejected = stats.depth_rejected,
            bounds_rejected = stats.bounds_rejected,
            backface_culled = stats.backface_culled,
            "draw complete"
        );

        stats
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
