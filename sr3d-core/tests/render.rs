//! End-to-end checks across parsing, clipping and rasterization
use sr3d_core::clip::{clip_to_screen, clip_triangle};
use sr3d_core::math::{direction, vec3};
use sr3d_core::raster::fill_triangle;
use sr3d_core::{
    obj, Color, Framebuffer, Mesh, Pipeline, Plane, RenderConfig, RenderMode, RotationState,
    Scene, Texture, Triangle, TriangleQueue,
};

const QUAD_OBJ: &str = "\
# square facing -z, wound clockwise from the front
v -1 -1 0
v -1  1 0
v  1  1 0
v  1 -1 0
vt 0 0
vt 0 1
vt 1 1
vt 1 0
f 1/1 2/2 3/3 4/4
";

fn lit(fb: &Framebuffer) -> usize {
    fb.pixels().iter().filter(|&&c| c != Color::BLACK).count()
}

#[test]
fn test_obj_quad_renders_centred() {
    let mesh = obj::parse_obj(QUAD_OBJ).unwrap();
    assert_eq!(mesh.len(), 2);

    let config = RenderConfig {
        width: 80,
        height: 40,
        ..RenderConfig::default()
    };
    let mut fb = config.framebuffer();
    let mut pipeline = Pipeline::new(config);
    let stats = pipeline.render(&mesh, &Scene::default(), None, &mut fb);

    assert_eq!(stats.culled, 0);
    assert_eq!(stats.rasterized, 2);
    assert_ne!(fb.pixel(40, 20), Some(Color::BLACK));
    assert_eq!(fb.pixel(0, 0), Some(Color::BLACK));
    assert_eq!(fb.pixel(79, 39), Some(Color::BLACK));
}

#[test]
fn test_obj_quad_from_behind_is_culled() {
    let mesh = obj::parse_obj(QUAD_OBJ).unwrap();
    let config = RenderConfig {
        width: 80,
        height: 40,
        ..RenderConfig::default()
    };
    let mut fb = config.framebuffer();
    let mut pipeline = Pipeline::new(config);
    // Half a turn about y shows the back of the quad
    let scene = Scene {
        rotation: RotationState::new(0.0, std::f32::consts::PI, 0.0),
        ..Scene::default()
    };
    let stats = pipeline.render(&mesh, &scene, None, &mut fb);
    assert_eq!(stats.culled, 2);
    assert_eq!(lit(&fb), 0);
}

#[test]
fn test_spinning_cube_stays_in_bounds() {
    let mesh = Mesh::cube(2.0);
    let texture = Texture::checkerboard(8, 2, Color::WHITE, Color::from_rgb(90, 90, 90));
    let config = RenderConfig {
        width: 48,
        height: 24,
        scale: 2,
        mode: RenderMode::Textured,
        ..RenderConfig::default()
    };
    let mut fb = config.framebuffer();
    let mut pipeline = Pipeline::new(config);
    let mut scene = Scene {
        offset: direction(0.0, 0.0, 2.2),
        ..Scene::default()
    };

    for _ in 0..40 {
        scene.rotation.rotate(0.11, 0.17, 0.05);
        let stats = pipeline.render(&mesh, &scene, Some(&texture), &mut fb);
        assert_eq!(stats.dropped, 0);
        // A convex solid never shows more than three faces
        assert!(stats.culled >= 6);
        assert!(stats.rasterized > 0);
        assert!(lit(&fb) > 0);
    }
    assert_eq!(fb.physical_size(), (96, 48));
}

#[test]
fn test_walking_camera_through_cube() {
    let mesh = Mesh::cube(2.0);
    let config = RenderConfig {
        width: 32,
        height: 16,
        mode: RenderMode::Wireframe,
        ..RenderConfig::default()
    };
    let mut fb = config.framebuffer();
    let mut pipeline = Pipeline::new(config);
    let mut scene = Scene::new(config.camera(vec3(0.0, 0.0, 0.0)));

    // Step forward until past the cube; the renderer must cope at every position
    for _ in 0..12 {
        let step = scene.camera.look_direction() * 0.5;
        scene.camera = scene.camera.moved(step);
        let stats = pipeline.render(&mesh, &scene, None, &mut fb);
        assert_eq!(stats.dropped, 0);
        assert!(stats.culled + stats.near_clipped <= stats.submitted);
    }
    // Past the far side, looking away: nothing in view
    let stats = pipeline.render(&mesh, &scene, None, &mut fb);
    assert_eq!(stats.rasterized, 0);
    assert_eq!(lit(&fb), 0);
}

#[test]
fn test_clip_scenario_then_cascade() {
    let tri = Triangle::new(vec3(0.0, 0.0, -1.0), vec3(0.0, 2.0, 1.0), vec3(2.0, 0.0, 1.0));
    let plane = Plane::new(vec3(0.0, 0.0, 0.0), direction(0.0, 0.0, 1.0));
    let pieces: Vec<Triangle> = clip_triangle(&plane, &tri).into_iter().collect();
    assert_eq!(pieces.len(), 2);

    // Scaled onto a screen, every piece is already inside the viewport
    let mut queue = TriangleQueue::new();
    for piece in &pieces {
        let on_screen = piece.map_vertices(|v| vec3(v.x * 10.0 + 5.0, v.y * 10.0 + 5.0, v.z));
        clip_to_screen(&on_screen, 40, 40, &mut queue);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_front(), Some(on_screen));
    }
}

#[test]
fn test_solid_fill_scenario() {
    let mut fb = Framebuffer::new(8, 8, 1);
    let c = Color::from_rgb(200, 40, 40);
    let tri = Triangle::new(vec3(0.0, 0.0, 0.0), vec3(4.0, 0.0, 0.0), vec3(0.0, 4.0, 0.0));
    fill_triangle(&mut fb, &tri, c);
    assert_eq!(fb.pixel(0, 0), Some(c));
    assert_eq!(fb.pixel(2, 0), Some(c));
    assert_eq!(fb.pixel(4, 4), Some(Color::BLACK));
}
