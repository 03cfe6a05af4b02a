use approx::assert_abs_diff_eq;
use patchsweep::coverage::{plan_sweep, SweepParams};
use patchsweep::filters::{slab_filter, SlabParams};
use patchsweep::segmentation::fit_plane;
use patchsweep::{analyze_selection, GeometryError, PatchParams, Point3, PointCloud};

fn unit_square() -> PointCloud {
    PointCloud::from_xyz(
        vec![1.0, 1.0, -1.0, -1.0],
        vec![1.0, -1.0, 1.0, -1.0],
        vec![0.0; 4],
    )
}

/// Grid of points on the plane through `origin` spanned by `u` and `v`.
fn plane_grid(origin: [f32; 3], u: [f32; 3], v: [f32; 3], n: i32) -> PointCloud {
    let mut cloud = PointCloud::new();
    for i in -n..=n {
        for j in -n..=n {
            let (a, b) = (i as f32 * 0.1, j as f32 * 0.1);
            cloud.push(Point3::new(
                origin[0] + a * u[0] + b * v[0],
                origin[1] + a * u[1] + b * v[1],
                origin[2] + a * u[2] + b * v[2],
            ));
        }
    }
    cloud
}

/// Selection, scene and path all on the unit square at half pitch.
#[test]
fn unit_square_end_to_end() {
    let params = PatchParams {
        sweep: SweepParams {
            row_pitch: 0.5,
            ..SweepParams::default()
        },
        ..PatchParams::default()
    };
    let square = unit_square();
    let out = analyze_selection(&square, &square, &params).unwrap();

    assert_eq!(out.plane.centroid(), Point3::ORIGIN);
    assert_eq!(out.patch, square);
    assert_eq!(out.path.row_count(), 4);
    assert_eq!(out.path.len(), 21);
    assert_eq!(out.path.waypoints()[0], Point3::ORIGIN);

    let first_row: Vec<f32> = out.path.rows().next().unwrap().iter().map(|p| p.x).collect();
    assert_eq!(first_row, vec![1.0, 0.5, 0.0, -0.5, -1.0]);
}

#[test]
fn stages_compose_like_the_pipeline() {
    let scene = plane_grid([0.0, 0.0, 0.5], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 6);
    let selection = plane_grid([0.1, 0.0, 0.5], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 1);

    let plane = fit_plane(&selection).unwrap();
    let patch = slab_filter(&scene, plane.centroid(), &SlabParams::default());
    let plan = plan_sweep(&patch, plane.centroid(), &SweepParams::default()).unwrap();

    let out = analyze_selection(&scene, &selection, &PatchParams::default()).unwrap();
    assert_eq!(out.plane, plane);
    assert_eq!(out.patch, patch);
    assert_eq!(out.corners, plan.corners);
    assert_eq!(out.path, plan.path);
}

#[test]
fn tilted_plane_recovered() {
    // Plane x + 2y + 2z = 3, normal (1, 2, 2) / 3
    let n = [1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0];
    let u = [2.0 / 3.0, 1.0 / 3.0, -2.0 / 3.0];
    let v = [2.0 / 3.0, -2.0 / 3.0, 1.0 / 3.0];
    let origin = [1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0];
    let cloud = plane_grid(origin, u, v, 4);

    let plane = fit_plane(&cloud).unwrap();
    let normal = plane.normal();
    let sign = if normal[0] > 0.0 { 1.0 } else { -1.0 };
    for k in 0..3 {
        assert_abs_diff_eq!(normal[k], sign * n[k], epsilon = 1e-4);
    }
    assert_abs_diff_eq!(plane.offset(), sign * 1.0, epsilon = 1e-4);
    assert_abs_diff_eq!(
        plane.offset(),
        plane.centroid().dot(&plane.normal()),
        epsilon = 1e-6
    );
    for p in cloud.iter_points() {
        assert!(plane.distance_to_point(p) < 1e-4);
    }
}

#[test]
fn collinear_selection_is_degenerate() {
    let selection =
        PointCloud::from_xyz(vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.0], vec![0.0, 1.0, 2.0]);
    let err = analyze_selection(&unit_square(), &selection, &PatchParams::default()).unwrap_err();
    assert!(matches!(err, GeometryError::DegeneratePlane { .. }));
}

#[test]
fn short_selection_is_insufficient() {
    let selection = PointCloud::from_xyz(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.0, 0.0]);
    let err = analyze_selection(&unit_square(), &selection, &PatchParams::default()).unwrap_err();
    assert_eq!(err, GeometryError::InsufficientData { required: 3, found: 2 });
}

#[test]
fn params_from_partial_json() {
    let params: PatchParams = serde_json::from_str(r#"{ "sweep": { "row_pitch": 0.5 } }"#).unwrap();
    assert_eq!(params.sweep.row_pitch, 0.5);
    assert_eq!(params.sweep.columns_per_row, 5);
    assert_eq!(params.slab, SlabParams::default());

    let json = r#"{ "slab": { "radial_metric": "euclidean", "band_z": 0.2 } }"#;
    let params: PatchParams = serde_json::from_str(json).unwrap();
    assert_eq!(params.slab.band_z, 0.2);
    assert_eq!(params.slab.plane_tolerance, 0.01);
    assert_eq!(params.slab.radial_metric, patchsweep::filters::RadialMetric::Euclidean);
    assert_eq!(params.sweep, SweepParams::default());

    let params: PatchParams = serde_json::from_str("{}").unwrap();
    assert_eq!(params, PatchParams::default());
}

#[test]
fn analysis_serializes_to_json() {
    let square = unit_square();
    let out = analyze_selection(&square, &square, &PatchParams::default()).unwrap();
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["patch"]["x"].as_array().unwrap().len(), 4);
    assert!(json["corners"]["left_up"].is_object());
    assert_eq!(
        json["path"]["waypoints"].as_array().unwrap().len(),
        out.path.len()
    );
    assert!(json["plane"]["normal"].is_array());
}
