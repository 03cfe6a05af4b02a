//! Plan a sweep over a synthetic table top.
//!
//! Run with `RUST_LOG=debug` to see every stage. An optional argument names
//! a JSON file with `PatchParams`; missing fields keep their defaults.

use patchsweep::{analyze_selection_in_frame, PatchParams, Point3, PointCloud, RigidTransform};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let params: PatchParams = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => PatchParams::default(),
    };
    println!("Params: {}", serde_json::to_string(&params)?);

    // Sensor-frame scene: table 0.9 m below the sensor, floor further down
    let mut rng = StdRng::seed_from_u64(1);
    let mut scene = PointCloud::new();
    for _ in 0..30_000 {
        scene.push(Point3::new(
            rng.gen_range(-0.6f32..0.6),
            rng.gen_range(-0.4f32..0.4),
            -0.9 + rng.gen_range(-0.002f32..0.002),
        ));
    }
    for _ in 0..10_000 {
        scene.push(Point3::new(
            rng.gen_range(-2.0f32..2.0),
            rng.gen_range(-2.0f32..2.0),
            -1.6 + rng.gen_range(-0.005f32..0.005),
        ));
    }
    println!("Scene: {} points", scene.len());

    // What the user clicked: a small disc on the table
    let selection: PointCloud = scene
        .iter_points()
        .filter(|p| p.x.hypot(p.y - 0.1) < 0.08 && p.z > -1.0)
        .collect();
    println!("Selection: {} points", selection.len());

    // Sensor mounted 1.6 m above the floor, looking along the robot's +x
    let sensor_to_base = RigidTransform::from_yaw(std::f32::consts::FRAC_PI_2, [0.2, 0.0, 1.6]);
    let out = analyze_selection_in_frame(&scene, &selection, &sensor_to_base, &params)?;

    let normal = out.plane.normal();
    println!(
        "Plane: normal [{:.4}, {:.4}, {:.4}], offset {:.4}",
        normal[0],
        normal[1],
        normal[2],
        out.plane.offset()
    );
    println!("Patch: {} points", out.patch.len());
    if let Some(corners) = out.corners {
        println!("Corners: {:?}", corners);
    }
    println!(
        "Path: {} rows x {} columns, {} waypoints",
        out.path.row_count(),
        out.path.columns(),
        out.path.len()
    );
    for (i, p) in out.path.waypoints().iter().enumerate() {
        println!("  {:3}: [{:.3}, {:.3}, {:.3}]", i, p.x, p.y, p.z);
    }
    Ok(())
}
