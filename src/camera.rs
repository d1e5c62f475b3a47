//! Camera and mouse interaction.
//!
//! Left drag orbits around the target, right or middle drag pans, and the
//! wheel zooms.

use cgmath::{Deg, EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector2, Vector3};
use log::trace;
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta},
};

use crate::util::bbox::BoundingBox3d;

/// Vertical field of view.
pub const FOVY: Deg<f32> = Deg(45.0);
/// Pitch limit in degrees, to keep the camera from flipping over the poles.
pub const MAX_PITCH: f32 = 89.0;
/// Minimum distance between the camera and the target.
pub const MIN_DISTANCE: f32 = 1e-3;
/// Maximum distance between the camera and the target.
pub const MAX_DISTANCE: f32 = 1e5;
/// Distance multiplier per wheel line.
pub const ZOOM_STEP: f32 = 1.1;
/// Rotation in degrees per dragged pixel.
pub const ORBIT_SENSITIVITY: f32 = 0.4;
/// Pan per dragged pixel, relative to the distance.
pub const PAN_SENSITIVITY: f32 = 0.002;
/// Pixels of precise scrolling counted as one wheel line.
const PIXELS_PER_LINE: f64 = 20.0;

/// Camera pose restored by [`OrbitCamera::reset`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct Home {
    /// Target.
    target: Point3<f32>,
    /// Distance.
    distance: f32,
    /// Radius of the framed content.
    radius: f32,
}

impl Default for Home {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            distance: 3.0,
            radius: 1.0,
        }
    }
}

/// Camera orbiting around a target point.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Point to look at and orbit around.
    target: Point3<f32>,
    /// Distance from the target.
    distance: f32,
    /// Rotation around the Y axis, in degrees.
    yaw: f32,
    /// Rotation around the X axis, in degrees.
    pitch: f32,
    /// Screen-space offset.
    pan: Vector2<f32>,
    /// Radius of the framed content.
    radius: f32,
    /// Initial pose.
    home: Home,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::with_home(Home::default())
    }
}

impl OrbitCamera {
    /// Creates a new `OrbitCamera` looking at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a camera at the given pose.
    fn with_home(home: Home) -> Self {
        Self {
            target: home.target,
            distance: home.distance,
            yaw: 0.0,
            pitch: 0.0,
            pan: Vector2::new(0.0, 0.0),
            radius: home.radius,
            home,
        }
    }

    /// Returns the target.
    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    /// Returns the distance from the target.
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Returns the yaw in degrees.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Returns the pitch in degrees.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Returns the pan offset.
    pub fn pan(&self) -> Vector2<f32> {
        self.pan
    }

    /// Looks at the given bounding box from far enough to see all of it.
    ///
    /// The framing becomes the pose restored by [`reset`](Self::reset).
    pub fn frame(&mut self, bbox: &BoundingBox3d<f32>) {
        let radius = match bbox.radius() {
            r if r > 0.0 => r,
            _ => 1.0,
        };
        let half_fovy: Rad<f32> = (FOVY / 2.0).into();
        let distance = (radius / half_fovy.0.sin() * 1.1)
            .max(MIN_DISTANCE)
            .min(MAX_DISTANCE);
        *self = Self::with_home(Home {
            target: bbox.center(),
            distance,
            radius,
        });
    }

    /// Restores the initial pose.
    pub fn reset(&mut self) {
        *self = Self::with_home(self.home);
    }

    /// Rotates the camera.
    pub fn orbit(&mut self, d_yaw: f32, d_pitch: f32) {
        self.yaw = (self.yaw + d_yaw) % 360.0;
        self.pitch = (self.pitch + d_pitch).max(-MAX_PITCH).min(MAX_PITCH);
    }

    /// Moves the view parallel to the screen.
    pub fn pan_by(&mut self, dx: f32, dy: f32) {
        self.pan += Vector2::new(dx, dy);
    }

    /// Zooms in for positive `lines`, out for negative ones.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * ZOOM_STEP.powf(-lines))
            .max(MIN_DISTANCE)
            .min(MAX_DISTANCE);
    }

    /// Returns the view matrix.
    pub fn view(&self) -> Matrix4<f32> {
        Matrix4::from_translation(Vector3::new(self.pan.x, self.pan.y, -self.distance))
            * Matrix4::from_angle_x(Deg(self.pitch))
            * Matrix4::from_angle_y(Deg(self.yaw))
            * Matrix4::from_translation(-self.target.to_vec())
    }

    /// Returns the perspective projection matrix, in OpenGL clip space.
    pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
        let near = (self.distance * 0.01).max(MIN_DISTANCE * 0.1);
        // Panning moves the model sideways only, so its depth stays within
        // `distance +- radius`.
        let far = (self.distance + self.radius) * 1.5;
        cgmath::perspective(FOVY, aspect, near, far)
    }
}

/// Mouse buttons and cursor tracking.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct MouseState {
    /// Whether the orbit button is held.
    orbiting: bool,
    /// Whether a pan button is held.
    panning: bool,
    /// Last cursor position.
    cursor: Option<PhysicalPosition<f64>>,
}

impl MouseState {
    /// Creates a new `MouseState`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the orbit button is held.
    pub fn is_orbiting(&self) -> bool {
        self.orbiting
    }

    /// Returns whether a pan button is held.
    pub fn is_panning(&self) -> bool {
        self.panning
    }

    /// Handles a button press or release.
    pub fn button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.orbiting = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            MouseButton::Other(_) => {}
        }
    }

    /// Handles cursor motion.
    ///
    /// Returns `true` if the camera was changed.
    pub fn cursor_moved(
        &mut self,
        camera: &mut OrbitCamera,
        position: PhysicalPosition<f64>,
    ) -> bool {
        let prev = match self.cursor.replace(position) {
            Some(prev) => prev,
            None => return false,
        };
        let dx = (position.x - prev.x) as f32;
        let dy = (position.y - prev.y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }

        let mut changed = false;
        if self.orbiting {
            camera.orbit(dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY);
            changed = true;
        }
        if self.panning {
            let scale = camera.distance() * PAN_SENSITIVITY;
            // Screen Y grows downward.
            camera.pan_by(dx * scale, -dy * scale);
            changed = true;
        }
        if changed {
            trace!(
                "Camera moved: yaw={}, pitch={}, pan={:?}",
                camera.yaw(),
                camera.pitch(),
                camera.pan()
            );
        }
        changed
    }

    /// Handles the cursor leaving the window.
    ///
    /// Drags end, since button releases outside the window may be lost.
    pub fn cursor_left(&mut self) {
        *self = Self::default();
    }

    /// Handles a wheel event.
    pub fn scroll(&mut self, camera: &mut OrbitCamera, delta: MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        camera.zoom(lines);
        trace!("Camera zoomed: distance={}", camera.distance());
    }
}

/// Constant auto rotation of the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    /// Degrees per frame.
    step: f32,
    /// Current angle in degrees.
    angle: f32,
    /// Point the model rotates around.
    pivot: Point3<f32>,
}

impl Spin {
    /// Creates a new `Spin` with the given degrees per frame, rotating around
    /// `pivot`.
    pub fn new(step: f32, pivot: Point3<f32>) -> Self {
        Self {
            step,
            angle: 0.0,
            pivot,
        }
    }

    /// Returns the current angle in degrees.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advances one frame.
    pub fn advance(&mut self) {
        self.angle = (self.angle + self.step) % 360.0;
    }

    /// Returns the model matrix.
    pub fn model(&self) -> Matrix4<f32> {
        let axis = Vector3::new(1.0, 1.0, 0.0).normalize();
        let pivot = self.pivot.to_vec();
        Matrix4::from_translation(pivot)
            * Matrix4::from_axis_angle(axis, Deg(self.angle))
            * Matrix4::from_translation(-pivot)
    }
}
