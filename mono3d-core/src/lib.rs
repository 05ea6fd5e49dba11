//! mono3d Core Library - software 3D rendering for 1-bit displays
//!
//! This library turns a static triangle mesh, a camera and a directional
//! light into back-to-front, lit, stippled triangles handed to a
//! [`Rasterizer`]. It also carries the radix sort used for depth ordering.

pub mod config;
pub mod error;
pub mod geometry;
pub mod pattern;
pub mod projection;
pub mod radix;
pub mod raster;
pub mod scene;
pub mod scratch;
pub mod transform;

// Re-export commonly used types
pub use config::{FaceOrdering, SceneConfig, Viewport};
pub use error::{Error, Result};
pub use geometry::Shape;
pub use pattern::{Pattern, PATTERNS};
pub use projection::{Camera, Projection};
pub use radix::SortBuffer;
pub use raster::Rasterizer;
pub use scene::{DrawStats, RenderStyle, Scene};
pub use transform::{RotationState, Xform};

pub use nalgebra::{Point2, Vector3};
