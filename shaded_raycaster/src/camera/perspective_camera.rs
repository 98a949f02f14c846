use nalgebra::{vector, Point3, Vector2, Vector3};

use crate::common::{BoundBox, Ray, ViewportBox};

/// Ray-casting camera
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    /// Position of the camera in world coordinates
    position: Point3<f32>,
    /// Up direction from the camera's perspective
    up: Vector3<f32>,
    /// Right direction from the camera's perspective
    right: Vector3<f32>,
    /// Direction of camera, unit
    direction: Vector3<f32>,
    /// Aspect ratio of image plane
    aspect: f32,
    /// Vertical Field of View in degrees
    fov_y: f32,
    /// Size of image plane
    img_plane_size: Vector2<f32>, // Calculated from fov_y
    /// Direction of ray passing through pixel \[0,0\], upper left corner
    dir_00: Vector3<f32>,
    /// Vector offset between two horizontally neighbouring pixels (such as: \[0,0\] -> \[1,0\])
    du: Vector3<f32>,
    /// Vector offset between two vertically neighbouring pixels (such as: \[0,0\] -> \[0,1\])
    dv: Vector3<f32>,
}

impl PerspectiveCamera {
    /// Construct new camera
    ///
    /// # Arguments
    ///
    /// * `position` - Position of the camera in world coordinates
    /// * `direction` - Looking direction of the camera
    ///
    /// # Notes
    ///
    /// The up direction is assumed to be the positive y axis.
    /// When looking straight along it, positive z is used instead.
    ///
    /// Default fov is 60 degrees, default aspect ratio is 1.
    pub fn new(position: Point3<f32>, direction: Vector3<f32>) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera {
            position,
            up: vector![0.0, 1.0, 0.0],
            right: vector![1.0, 0.0, 0.0],
            direction,
            aspect: 1.0,
            fov_y: 60.0,
            img_plane_size: vector![0.0, 0.0],
            dir_00: Vector3::zeros(),
            du: Vector3::zeros(),
            dv: Vector3::zeros(),
        };
        camera.recalc_plane_size();
        camera.recalc_plane();
        camera
    }

    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Point3<f32>, target: Point3<f32>) -> PerspectiveCamera {
        PerspectiveCamera::new(position, target - position)
    }

    /// Camera on a sphere around `center`, looking at the center.
    ///
    /// `theta` is the polar angle measured from the positive y axis,
    /// `phi` the azimuth in the xz plane. Both in radians.
    pub fn on_sphere(center: Point3<f32>, radius: f32, theta: f32, phi: f32) -> PerspectiveCamera {
        let offset = vector![
            radius * theta.sin() * phi.cos(),
            radius * theta.cos(),
            radius * theta.sin() * phi.sin()
        ];
        PerspectiveCamera::looking_at(center + offset, center)
    }

    /// Changes aspect ratio to match `(width, height)` resolution
    pub fn change_aspect_from_resolution(&mut self, width: usize, height: usize) {
        self.change_aspect(width as f32 / height as f32);
    }

    /// Change aspect ratio of camera
    ///
    /// For example 1.7777 for 16:9 ratio
    pub fn change_aspect(&mut self, aspect_ratio: f32) {
        self.aspect = aspect_ratio;
        self.recalc_plane_size();
        self.recalc_dudv();
    }

    // Call when camera direction changed
    fn recalc_plane(&mut self) {
        self.direction = self.direction.normalize();

        let mut world_up = vector![0.0, 1.0, 0.0];
        if self.direction.cross(&world_up).norm() < 1e-6 {
            world_up = vector![0.0, 0.0, 1.0];
        }
        self.right = self.direction.cross(&world_up).normalize();
        self.up = self.right.cross(&self.direction);

        self.recalc_dudv();
    }

    // Call when fov or aspect ratio changed
    fn recalc_plane_size(&mut self) {
        self.img_plane_size = vector![0.0, 2.0 * f32::tan(f32::to_radians(0.5 * self.fov_y))];
        self.img_plane_size.x = self.img_plane_size.y * self.aspect;
    }

    fn recalc_dudv(&mut self) {
        self.du = self.img_plane_size.x * self.right;
        self.dv = -self.img_plane_size.y * self.up; // Notice '-' sign, buffer y=0 is up
        self.dir_00 = self.direction - 0.5 * self.du - 0.5 * self.dv;
    }

    /// Get ray originating in the camera position crossing view plane in coordinates `pixel_coord`
    ///
    /// # Arguments
    ///
    /// * pixel_coord - Coordinates in the range of `<0;1>x<0;1>`, point \[0,0\] being upper left corner
    pub fn get_ray(&self, pixel_coord: (f32, f32)) -> Ray {
        let dir = self.dir_00 + self.du * pixel_coord.0 + self.dv * pixel_coord.1;
        Ray::new(self.position, dir.normalize())
    }

    /// Project bounding box of a volume to viewport
    ///
    /// Resulting viewport box is the minimal orthogonal rectangular projection.
    /// Corners behind the camera make the whole viewport visible.
    pub fn project_box(&self, bound_box: BoundBox) -> ViewportBox {
        // Source: https://github.com/ospray/ospray, Intel corp., Apache 2.0 license
        let mut viewbox = ViewportBox::new();

        let dun = self.du.normalize() / self.img_plane_size.x;
        let dvn = self.dv.normalize() / self.img_plane_size.y;

        for point in bound_box {
            let n = (point - self.position).normalize();

            let den = n.dot(&self.direction);
            if den <= 0.0 {
                viewbox.add_point(0.0, 0.0);
                viewbox.add_point(1.0, 1.0);
                continue;
            }
            let screen_dir = n / den - self.dir_00;
            viewbox.add_point(screen_dir.dot(&dun), screen_dir.dot(&dvn));
        }

        viewbox
    }

    /// Direction getter
    pub fn get_dir(&self) -> Vector3<f32> {
        self.direction
    }

    /// Position getter
    pub fn get_pos(&self) -> Point3<f32> {
        self.position
    }
}

#[cfg(test)]
mod test {

    use nalgebra::point;

    use super::*;

    fn compare_float(actual: f32, expected: f32) {
        let err = f32::abs(actual - expected);
        assert!(err < 1e-5, "{actual} != {expected}");
    }

    #[test]
    fn camera_du_dv() {
        let cam = PerspectiveCamera::looking_at(point![0.0, 0.0, 0.0], point![1.0, 0.0, 0.0]);

        assert_eq!(cam.right, vector![0.0, 0.0, 1.0]);
        assert_eq!(cam.up, vector![0.0, 1.0, 0.0]);

        assert_eq!(cam.du.normalize(), vector![0.0, 0.0, 1.0]);
        assert_eq!(cam.dv.normalize(), vector![0.0, -1.0, 0.0]);
    }

    #[test]
    fn looking_straight_down() {
        let cam = PerspectiveCamera::looking_at(point![0.0, 10.0, 0.0], point![0.0, 0.0, 0.0]);
        let ray = cam.get_ray((0.5, 0.5));

        assert!((ray.direction - vector![0.0, -1.0, 0.0]).norm() < 1e-5);
    }

    #[test]
    fn project_origin() {
        let origin = point![0.0, 0.0, 0.0];
        let cam = PerspectiveCamera::looking_at(point![-10.0, 7.7, -9.6], origin);

        let projection = cam.project_box(BoundBox::new(origin, origin));

        compare_float(projection.lower.x, 0.5);
        compare_float(projection.lower.y, 0.5);
        compare_float(projection.upper.x, 0.5);
        compare_float(projection.upper.y, 0.5);
    }

    #[test]
    fn sphere_viewpoint_looks_at_center() {
        let center = point![1.0, 2.0, 3.0];
        let cam = PerspectiveCamera::on_sphere(center, 5.0, 1.0, 0.3);

        assert!(((cam.get_pos() - center).norm() - 5.0).abs() < 1e-4);
        let to_center = (center - cam.get_pos()).normalize();
        assert!((cam.get_dir() - to_center).norm() < 1e-5);
    }
}
