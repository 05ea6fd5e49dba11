use mono3d_core::{
    FaceOrdering, Pattern, Point2, Rasterizer, RenderStyle, RotationState, Scene, SceneConfig,
    Shape, Vector3, Xform, PATTERNS,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Fill([Point2<f32>; 3], Pattern),
    Line(Point2<f32>, Point2<f32>, u32, Pattern),
}

/// Records every primitive the scene asks for, in order
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn fills(&self) -> Vec<[Point2<f32>; 3]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Fill(p, _) => Some(*p),
                Call::Line(..) => None,
            })
            .collect()
    }

    fn line_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Line(..)))
            .count()
    }
}

impl Rasterizer for Recorder {
    fn fill_triangle(&mut self, p1: Point2<f32>, p2: Point2<f32>, p3: Point2<f32>, pattern: &Pattern) {
        self.calls.push(Call::Fill([p1, p2, p3], *pattern));
    }

    fn draw_line(&mut self, p1: Point2<f32>, p2: Point2<f32>, width: u32, pattern: &Pattern) {
        self.calls.push(Call::Line(p1, p2, width, *pattern));
    }
}

/// Front-facing triangle around the forward axis, offset by `dx`, at depth `z`
fn facing_triangle(dx: f32, z: f32) -> [Vector3<f32>; 3] {
    [
        Vector3::new(-0.5 + dx, -0.5, z),
        Vector3::new(dx, 0.5, z),
        Vector3::new(0.5 + dx, -0.5, z),
    ]
}

fn shape_from_triangles(triangles: &[[Vector3<f32>; 3]]) -> Shape {
    let points = triangles.iter().flatten().copied().collect();
    let faces = (0..triangles.len() as u16)
        .map(|i| [3 * i, 3 * i + 1, 3 * i + 2])
        .collect();
    Shape::new(points, faces, None).unwrap()
}

fn approx(a: Point2<f32>, b: Point2<f32>) -> bool {
    (a - b).norm() < 1e-2
}

#[test]
fn single_triangle_end_to_end() {
    let mut scene = Scene::new();
    // Light pointing back at the camera, matching the face normal
    scene.set_global_light(Vector3::new(0.0, 0.0, -1.0));

    let shape = shape_from_triangles(&[facing_triangle(0.0, 2.0)]);
    let mut rec = Recorder::default();
    let stats = scene.draw_shape(&mut rec, &shape, &Xform::identity(), RenderStyle::FILLED);

    assert_eq!(stats.drawn, 1);
    assert_eq!(rec.line_count(), 0);
    assert_eq!(rec.calls.len(), 1);

    let Call::Fill(points, pattern) = &rec.calls[0] else {
        panic!("expected a fill, got {:?}", rec.calls[0]);
    };
    assert_eq!(*pattern, PATTERNS[0]);
    assert!(approx(points[0], Point2::new(100.0, 60.0)));
    assert!(approx(points[1], Point2::new(160.0, 180.0)));
    assert!(approx(points[2], Point2::new(220.0, 60.0)));
}

#[test]
fn wireframe_only_strokes_three_edges() {
    let mut scene = Scene::new();
    scene.set_global_light(Vector3::new(0.0, 0.0, 1.0));

    let shape = shape_from_triangles(&[facing_triangle(0.0, 2.0)]);
    let mut rec = Recorder::default();
    scene.draw_shape(&mut rec, &shape, &Xform::identity(), RenderStyle::WIREFRAME);

    // Facing away from the light: fill level 32, edges at 16
    assert_eq!(rec.calls.len(), 3);
    for call in &rec.calls {
        assert!(matches!(call, Call::Line(_, _, 1, p) if *p == PATTERNS[16]));
    }
}

#[test]
fn faces_draw_back_to_front() {
    for ordering in [FaceOrdering::PackedKey, FaceOrdering::KeyValue] {
        let config = SceneConfig {
            face_ordering: ordering,
            ..SceneConfig::default()
        };
        let mut scene = Scene::with_config(config).unwrap();

        let near = facing_triangle(0.0, 2.0);
        let far = facing_triangle(0.0, 6.0);
        let middle = facing_triangle(0.0, 4.0);
        let shape = shape_from_triangles(&[near, far, middle]);

        let mut rec = Recorder::default();
        scene.draw_shape(&mut rec, &shape, &Xform::identity(), RenderStyle::FILLED);

        let projection = scene.projection();
        let expected: Vec<Point2<f32>> = [far, middle, near]
            .iter()
            .map(|t| projection.project(&t[0]).unwrap())
            .collect();
        let drawn: Vec<Point2<f32>> = rec.fills().iter().map(|f| f[0]).collect();

        assert_eq!(drawn.len(), 3, "{ordering:?}");
        for (d, e) in drawn.iter().zip(&expected) {
            assert!(approx(*d, *e), "{ordering:?}: drew {d:?}, expected {e:?}");
        }
    }
}

#[test]
fn face_behind_camera_is_never_rasterized() {
    let mut scene = Scene::new();
    let shape = shape_from_triangles(&[facing_triangle(0.0, 2.0)]);

    for z in [-2.0, -3.0] {
        let mut rec = Recorder::default();
        let placement = Xform::translation(Vector3::new(0.0, 0.0, z));
        let stats = scene.draw_shape(
            &mut rec,
            &shape,
            &placement,
            RenderStyle::FILLED | RenderStyle::WIREFRAME,
        );
        assert_eq!(stats.depth_rejected, 1);
        assert!(rec.calls.is_empty());
    }
}

#[test]
fn reversed_winding_is_culled() {
    let mut scene = Scene::new();
    let [a, b, c] = facing_triangle(0.0, 2.0);
    let shape = shape_from_triangles(&[[a, c, b]]);

    let mut rec = Recorder::default();
    let stats = scene.draw_shape(&mut rec, &shape, &Xform::identity(), RenderStyle::FILLED);
    assert_eq!(stats.backface_culled, 1);
    assert!(rec.calls.is_empty());
}

#[test]
fn cube_head_on_shows_only_its_near_face() {
    let mut scene = Scene::new();
    let placement = Xform::translation(Vector3::new(0.0, 0.0, 5.0));

    let mut rec = Recorder::default();
    let stats = scene.draw_shape(&mut rec, &Shape::cube(1.0), &placement, RenderStyle::FILLED);

    assert_eq!(stats.faces, 12);
    assert_eq!(stats.drawn, 2);
    assert_eq!(stats.backface_culled, 10);
    assert_eq!(rec.fills().len(), 2);
}

#[test]
fn placement_applies_before_camera() {
    let shape = shape_from_triangles(&[facing_triangle(0.0, 0.0)]);

    // Object pushed forward, camera at the origin
    let mut moved_object = Scene::new();
    let mut a = Recorder::default();
    moved_object.draw_shape(
        &mut a,
        &shape,
        &Xform::translation(Vector3::new(0.0, 0.0, 3.0)),
        RenderStyle::FILLED,
    );

    // Object at the origin, camera pulled back
    let mut moved_camera = Scene::new();
    moved_camera.set_camera(
        Vector3::new(0.0, 0.0, -3.0),
        Vector3::zeros(),
        1.0,
        Vector3::new(0.0, 1.0, 0.0),
    );
    let mut b = Recorder::default();
    moved_camera.draw_shape(&mut b, &shape, &Xform::identity(), RenderStyle::FILLED);

    let (fa, fb) = (a.fills(), b.fills());
    assert_eq!(fa.len(), 1);
    assert_eq!(fb.len(), 1);
    for (p, q) in fa[0].iter().zip(fb[0].iter()) {
        assert!(approx(*p, *q));
    }
}

#[test]
fn rotated_placement_still_culls_consistently() {
    // Spin the cube through a full turn; a convex shape never shows more
    // than three of its sides (six triangles).
    let mut scene = Scene::new();
    let mut rotation = RotationState::zero();
    for _ in 0..64 {
        rotation.rotate(0.11, 0.07, 0.05);
        let placement = Xform::rotation(&rotation).with_translation(Vector3::new(0.0, 0.0, 4.0));
        let mut rec = Recorder::default();
        let stats = scene.draw_shape(&mut rec, &Shape::cube(1.0), &placement, RenderStyle::FILLED);
        assert!(stats.drawn >= 2 && stats.drawn <= 6, "drew {}", stats.drawn);
        assert_eq!(stats.drawn + stats.backface_culled, 12);
    }
}

/// 257 faces, each further away than the last
fn many_faces() -> Vec<[Vector3<f32>; 3]> {
    (0..257)
        .map(|i| facing_triangle(i as f32 * 0.01, 10.0 + i as f32 * 0.01))
        .collect()
}

fn drawn_face_indices(scene: &Scene, triangles: &[[Vector3<f32>; 3]], rec: &Recorder) -> Vec<usize> {
    let projection = scene.projection();
    let starts: Vec<Point2<f32>> = triangles
        .iter()
        .map(|t| projection.project(&t[0]).unwrap())
        .collect();

    rec.fills()
        .iter()
        .map(|f| {
            starts
                .iter()
                .position(|s| approx(*s, f[0]))
                .expect("drawn triangle matches a face")
        })
        .collect()
}

#[test]
fn packed_keys_alias_past_256_faces() {
    let triangles = many_faces();
    let shape = shape_from_triangles(&triangles);
    let mut scene = Scene::new();

    let mut rec = Recorder::default();
    scene.draw_shape(&mut rec, &shape, &Xform::identity(), RenderStyle::FILLED);
    let drawn = drawn_face_indices(&scene, &triangles, &rec);

    // The farthest face, 256, carries index 0 in its low byte: face 0 is
    // drawn in its place and again in its own slot.
    let mut expected = vec![0];
    expected.extend((0..256).rev());
    assert_eq!(drawn, expected);
}

#[test]
fn key_value_ordering_has_no_face_limit() {
    let triangles = many_faces();
    let shape = shape_from_triangles(&triangles);
    let config = SceneConfig {
        face_ordering: FaceOrdering::KeyValue,
        ..SceneConfig::default()
    };
    let mut scene = Scene::with_config(config).unwrap();

    let mut rec = Recorder::default();
    scene.draw_shape(&mut rec, &shape, &Xform::identity(), RenderStyle::FILLED);
    let drawn = drawn_face_indices(&scene, &triangles, &rec);

    let expected: Vec<usize> = (0..257).rev().collect();
    assert_eq!(drawn, expected);
}
