use nalgebra::{Vector3, Vector4};
use objview_core::{
    transform::mvp_matrix, Camera, DegeneratePolicy, Error, Mesh, ModelTransform, OrbitAngles,
    Perspective,
};

const CUBE: &str = "\
# unit cube, quads
o Cube
v -1.0 -1.0  1.0
v  1.0 -1.0  1.0
v  1.0  1.0  1.0
v -1.0  1.0  1.0
v -1.0 -1.0 -1.0
v  1.0 -1.0 -1.0
v  1.0  1.0 -1.0
v -1.0  1.0 -1.0
vt 0.0 0.0
vn 0.0 0.0 1.0
s off
f 1/1/1 2/1/1 3/1/1 4/1/1
f 6/1/1 5/1/1 8/1/1 7/1/1
f 5/1/1 1/1/1 4/1/1 8/1/1
f 2/1/1 6/1/1 7/1/1 3/1/1
f 4/1/1 3/1/1 7/1/1 8/1/1
f 5/1/1 6/1/1 2/1/1 1/1/1
";

#[test]
fn cube_through_pipeline() {
    let mesh = Mesh::from_obj(CUBE, DegeneratePolicy::Reject).unwrap();
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.vertex_count(), 36);
    assert_eq!(mesh.normals.len(), mesh.positions.len());
    assert_eq!(mesh.position_buffer().len(), 36 * 4);
    assert_eq!(mesh.normal_buffer().len(), 36 * 3);

    for (points, normal) in mesh.triangles() {
        assert!((normal.norm() - 1.0).abs() < 1e-5);
        assert!(points.iter().all(|p| p.w == 1.0));
    }

    // (p2 - p0) x (p1 - p0) on a counter-clockwise +z face points to -z.
    let (_, front) = mesh.triangles().next().unwrap();
    assert!((front - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-6);
}

#[test]
fn malformed_file_aborts_load() {
    let result = Mesh::from_obj("v 1.0 foo 2.0\nf 1 1 1\n", DegeneratePolicy::default());
    assert!(matches!(result, Err(Error::MalformedInput { line: 1, .. })));
}

#[test]
fn missing_vertex_aborts_load() {
    let result = Mesh::from_obj("v 0 0 0\nv 1 0 0\nf 1 2 9\n", DegeneratePolicy::default());
    assert!(matches!(result, Err(Error::IndexOutOfRange { index: 8, len: 2 })));
}

#[test]
fn transform_chain_places_origin_in_front_of_camera() {
    let view = Camera::default().view_matrix(&OrbitAngles::zero()).unwrap();
    let projection = Perspective::new(90.0, 1.0, 10.0).matrix(1.0).unwrap();
    let model = ModelTransform::default().matrix();

    let clip = mvp_matrix(&model, &view, &projection) * Vector4::new(0.0, 0.0, 0.0, 1.0);
    // The view moves the origin to z = -1, one unit down the -z axis.
    assert!((clip.w - 1.0).abs() < 1e-6);
    assert!(clip.x.abs() < 1e-6 && clip.y.abs() < 1e-6);
}
