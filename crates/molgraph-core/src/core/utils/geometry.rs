use nalgebra::{Point3, Vector3};

pub fn distance(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    (a - b).norm()
}

pub fn plane_through(
    a0: &Point3<f64>,
    a1: &Point3<f64>,
    a2: &Point3<f64>,
) -> (Vector3<f64>, f64) {
    let normal = (a1 - a0).cross(&(a2 - a0));
    let offset = -normal.dot(&a0.coords);
    (normal, offset)
}

pub fn signed_distance_from_plane(
    normal: &Vector3<f64>,
    offset: f64,
    point: &Point3<f64>,
) -> f64 {
    let denominator = normal.norm();
    if denominator == 0.0 {
        return 0.0;
    }
    (normal.dot(&point.coords) + offset) / denominator
}
