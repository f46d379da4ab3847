use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Input accumulated but not yet applied to the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PendingMotion {
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pan: (f32, f32),
}

impl PendingMotion {
    const REST_EPSILON: f32 = 1e-6;

    fn scaled(self, factor: f32) -> Self {
        Self {
            yaw: self.yaw * factor,
            pitch: self.pitch * factor,
            zoom: self.zoom * factor,
            pan: (self.pan.0 * factor, self.pan.1 * factor),
        }
    }

    fn is_at_rest(&self) -> bool {
        [self.yaw, self.pitch, self.zoom, self.pan.0, self.pan.1]
            .iter()
            .all(|v| v.abs() < Self::REST_EPSILON)
    }
}

/// Orbit controls with inertia.
///
/// Drags and wheel steps are queued; every [`CameraController::update`] applies
/// `damping_factor` of what is queued and keeps the rest for later frames, so a
/// single input eases in over several frames and converges to its full amount.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of the queued motion applied per update; `1.0` disables damping.
    pub damping_factor: f32,
    pending: PendingMotion,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping_factor: 1.0,
            pending: PendingMotion::default(),
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn with_pan_speed(mut self, pan_speed: f32) -> Self {
        self.pan_speed = pan_speed;
        self
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.damping_factor = damping_factor.clamp(f32::EPSILON, 1.0);
        self
    }

    /// Raw mouse motion; only counts while the left button is held.
    pub fn process_events(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.is_mouse_pressed {
                self.drag(delta.0 as f32, delta.1 as f32);
            }
        }
    }

    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        if button == MouseButton::Left {
            self.is_mouse_pressed = state == ElementState::Pressed;
        }
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let scroll_amount = -match delta {
            MouseScrollDelta::LineDelta(_, scroll) => *scroll,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => *scroll as f32,
        };
        self.pending.zoom += scroll_amount * self.zoom_speed;
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let KeyEvent {
            physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
            state,
            ..
        } = event
        {
            self.is_shift_held = *state == ElementState::Pressed;
        }
    }

    /// Queues a drag of `(dx, dy)` pixels: a pan with shift held, an orbit otherwise.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        if self.is_shift_held {
            self.pending.pan.0 -= dx * self.pan_speed;
            self.pending.pan.1 += dy * self.pan_speed;
        } else {
            self.pending.yaw -= dx * self.rotate_speed;
            self.pending.pitch += dy * self.rotate_speed;
        }
    }

    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }

    pub fn is_at_rest(&self) -> bool {
        self.pending.is_at_rest()
    }

    /// Advances the damping by one step.
    pub fn update(&mut self, camera: &mut OrbitCamera) {
        if self.pending.is_at_rest() {
            self.pending = PendingMotion::default();
            return;
        }

        let step = self.pending.scaled(self.damping_factor);
        camera.add_yaw(step.yaw);
        camera.add_pitch(step.pitch);
        if step.zoom != 0.0 {
            camera.add_distance(step.zoom);
        }
        if step.pan != (0.0, 0.0) {
            camera.pan(step.pan);
        }

        self.pending = self.pending.scaled(1.0 - self.damping_factor);
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Vector3, Zero};

    use super::*;

    fn camera() -> OrbitCamera {
        OrbitCamera::new(6.0, 0.2, 0.0, Vector3::zero(), 1.5)
    }

    #[test]
    fn test_damped_drag_eases_in_and_converges() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1).with_damping(0.05);
        controller.drag(-100.0, 0.0);

        controller.update(&mut camera);
        assert!((camera.yaw - 0.05).abs() < 1e-6, "first step applies 5%");

        for _ in 0..600 {
            controller.update(&mut camera);
        }
        assert!((camera.yaw - 1.0).abs() < 1e-4);
        assert!(controller.is_at_rest());
    }

    #[test]
    fn test_undamped_controller_applies_immediately() {
        let mut camera = camera();
        let mut controller = CameraController::new(0.01, 0.1);
        controller.drag(0.0, 10.0);
        controller.update(&mut camera);

        assert!((camera.pitch - 0.3).abs() < 1e-6);
        assert!(controller.is_at_rest());
    }

    #[test]
    fn test_mouse_motion_requires_left_button() {
        let mut controller = CameraController::new(0.01, 0.1);
        controller.process_events(&DeviceEvent::MouseMotion { delta: (5.0, 5.0) });
        assert!(controller.is_at_rest());

        controller.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(controller.is_rotating());
        controller.process_events(&DeviceEvent::MouseMotion { delta: (5.0, 5.0) });
        assert!(!controller.is_at_rest());
    }

    #[test]
    fn test_scroll_zooms_out_on_negative_lines() {
        let mut camera = camera();
        let start = camera.distance;
        let mut controller = CameraController::new(0.01, 0.1);
        controller.process_scroll(&MouseScrollDelta::LineDelta(0.0, -2.0));
        controller.update(&mut camera);

        assert!(camera.distance > start);
    }
}
