use crate::core::types::{Angle, Number, Point3, Vector3};
use crate::shared::ray::Ray;
use crate::shared::RtRequirement;
use thiserror::Error;

/// Generates primary rays for the renderer.
///
/// Implementations own whatever projection state they need; the renderer only
/// tells them the target resolution and asks for one ray per pixel.
pub trait Camera: RtRequirement {
    /// The world-space ray through the centre of pixel `(x, y)`.
    ///
    /// `(0, 0)` is the top-left pixel; `x` grows rightwards, `y` downwards.
    fn primary_ray(&self, x: usize, y: usize) -> Ray;

    /// Informs the camera of the image resolution it will be rendered at
    fn set_resolution(&mut self, width: usize, height: usize);
}

#[derive(Error, Copy, Clone, Debug, PartialEq)]
pub enum CameraInvalidError {
    /// `look_at` coincides with the eye position
    #[error("the view direction couldn't be normalised (eye and target coincide)")]
    ForwardVectorInvalid,
    /// `up` is zero or (anti)parallel to the view direction
    #[error("the `up` vector couldn't be normalised against the view direction")]
    UpVectorInvalid,
    #[error("the horizontal FOV must lie strictly between 0 and 180 degrees")]
    FovInvalid,
}

/// A pinhole camera described by eye position, target point, up hint and
/// horizontal field of view.
///
/// The image plane sits at unit distance along the view direction; the
/// vertical extent follows from the aspect ratio of the most recently set
/// resolution. Mutating any parameter re-derives the plane basis immediately,
/// so an invalid configuration is rejected at the mutation site rather than
/// surfacing mid-render.
#[derive(Copy, Clone, Debug)]
pub struct PerspectiveCamera {
    position: Point3,
    look_at: Point3,
    up: Vector3,
    horizontal_fov: Angle,
    width: usize,
    height: usize,

    // derived image-plane frame
    top_left: Point3,
    right_step: Vector3,
    down_step: Vector3,
}

impl PerspectiveCamera {
    pub fn new(
        position: Point3,
        look_at: Point3,
        up: Vector3,
        horizontal_fov: Angle,
    ) -> Result<Self, CameraInvalidError> {
        let mut camera = Self {
            position,
            look_at,
            up,
            horizontal_fov,
            width: 1,
            height: 1,
            top_left: position,
            right_step: Vector3::ZERO,
            down_step: Vector3::ZERO,
        };
        camera.rebuild()?;
        Ok(camera)
    }

    pub fn position(&self) -> Point3 { self.position }

    pub fn look_at(&self) -> Point3 { self.look_at }

    pub fn horizontal_fov(&self) -> Angle { self.horizontal_fov }

    pub fn set_position(&mut self, position: Point3) -> Result<(), CameraInvalidError> {
        self.position = position;
        self.rebuild()
    }

    /// The target point; must not coincide with the eye position
    pub fn set_look_at(&mut self, look_at: Point3) -> Result<(), CameraInvalidError> {
        self.look_at = look_at;
        self.rebuild()
    }

    pub fn set_up(&mut self, up: Vector3) -> Result<(), CameraInvalidError> {
        self.up = up;
        self.rebuild()
    }

    pub fn set_fov(&mut self, horizontal_fov: Angle) -> Result<(), CameraInvalidError> {
        self.horizontal_fov = horizontal_fov;
        self.rebuild()
    }

    /// Recomputes the image-plane frame from the current parameters
    fn rebuild(&mut self) -> Result<(), CameraInvalidError> {
        let forward = (self.look_at - self.position)
            .try_normalize()
            .ok_or(CameraInvalidError::ForwardVectorInvalid)?;
        let right = forward
            .cross(self.up)
            .try_normalize()
            .ok_or(CameraInvalidError::UpVectorInvalid)?;
        let down = forward.cross(right);

        let half_width = (self.horizontal_fov / 2.).tan();
        if !(half_width > 0. && half_width.is_finite()) {
            return Err(CameraInvalidError::FovInvalid);
        }
        let (w, h) = (self.width as Number, self.height as Number);
        let half_height = half_width * h / w;

        self.right_step = right * (2. * half_width / w);
        self.down_step = down * (2. * half_height / h);
        // centre of the top-left pixel, half a step in from the plane corner
        self.top_left = self.position + forward - right * half_width - down * half_height
            + (self.right_step + self.down_step) * 0.5;

        Ok(())
    }
}

impl Camera for PerspectiveCamera {
    fn primary_ray(&self, x: usize, y: usize) -> Ray {
        let target =
            self.top_left + self.right_step * x as Number + self.down_step * y as Number;
        Ray::new(self.position, target - self.position)
    }

    fn set_resolution(&mut self, width: usize, height: usize) {
        self.width = width.max(1);
        self.height = height.max(1);
        // parameters were valid before and resolution cannot invalidate them
        let _ = self.rebuild();
    }
}
