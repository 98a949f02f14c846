use nalgebra::{Point3, Vector3};

use super::BoundBox;

/// Ray cast by camera.
/// Main usecase is getting intersections with the volume ([`BoundBox::intersect`]),
/// then iterating over the intersected line segment in steps.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Construct new ray using `origin` and `direction`.
    /// `direction` must be unit vector.
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Ray {
        Ray { origin, direction }
    }

    /// Returns point `t` units far from ray origin in ray direction
    pub fn point_from_t(&self, t: f32) -> Point3<f32> {
        self.origin + t * self.direction
    }

    /// Clip ray to `bound_box` and transform it into voxel coordinates.
    ///
    /// Returned ray starts at the entry point, its direction is scaled
    /// so that one unit of `t` still means one world unit.
    /// The second value is the length of the clipped segment in world units.
    ///
    /// # Params
    /// * `bound_box` - Bounding box of volume, world coordinates
    /// * `spacing` - Shape of cells in volume
    pub fn to_volume_space(&self, bound_box: BoundBox, spacing: Vector3<f32>) -> Option<(Ray, f32)> {
        let (t0, t1) = bound_box.intersect(self)?;
        let entry = self.point_from_t(t0);

        let origin = Point3::from((entry - bound_box.lower).component_div(&spacing));
        let direction = self.direction.component_div(&spacing);

        Some((Ray { origin, direction }, t1 - t0))
    }
}

#[cfg(test)]
mod test {
    use nalgebra::{point, vector};

    use super::*;

    #[test]
    fn to_volume_space() {
        let ray = Ray::new(point![0.0, 0.0, 0.0], vector![1.0, 1.0, 1.0].normalize());
        let bbox = BoundBox::new(point![1.0, 1.0, 1.0], point![5.0, 5.0, 5.0]);
        let spacing = vector![2.0, 1.0, 1.0];

        let (obj_ray, length) = ray.to_volume_space(bbox, spacing).unwrap();

        assert!((obj_ray.origin - point![0.0, 0.0, 0.0]).norm() < 1e-5);
        assert!((obj_ray.direction.normalize() - vector![0.5, 1.0, 1.0].normalize()).norm() < 1e-5);
        assert!((length - 4.0 * f32::sqrt(3.0)).abs() < 1e-4);
    }

    #[test]
    fn to_volume_space_offset() {
        let ray = Ray::new(point![5.0, 0.5, 0.5], vector![1.0, 0.0, 0.0]);
        let bbox = BoundBox::new(point![6.0, 0.0, 0.0], point![7.0, 1.0, 1.0]);

        let (obj_ray, length) = ray.to_volume_space(bbox, vector![1.0, 1.0, 1.0]).unwrap();

        assert_eq!(obj_ray.origin, point![0.0, 0.5, 0.5]);
        assert!((length - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_the_box() {
        let ray = Ray::new(point![0.0, 5.0, 0.0], vector![1.0, 0.0, 0.0]);
        let bbox = BoundBox::new(point![1.0, 0.0, 0.0], point![2.0, 1.0, 1.0]);
        assert!(ray.to_volume_space(bbox, vector![1.0, 1.0, 1.0]).is_none());
    }
}
