use courier_core::geometry::Aabb;
use courier_core::timer::Timer;
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;

/// Shake oscillation frequencies (rad/s). Offset axes use different
/// frequencies so the motion reads as a rattle, not a circle.
const SHAKE_FREQ_X: f32 = 55.0;
const SHAKE_FREQ_Y: f32 = 47.0;

/// Horizontally-following camera with world-bounds clamping and an
/// impulse-driven shake layered on top.
///
/// Smoothing and clamping always operate on the unshaken base position;
/// the shake offset only appears in the public getters, so an active shake
/// never feeds back into the follow logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    base_x: f32,
    base_y: f32,
    target_x: f32,
    world_width: f32,
    world_height: f32,
    cfg: CameraConfig,
    shake_timer: Timer,
    shake_intensity: f32,
}

impl Camera {
    pub fn new(world_width: f32, world_height: f32, cfg: CameraConfig) -> Self {
        Self {
            base_x: 0.0,
            base_y: 0.0,
            target_x: 0.0,
            world_width,
            world_height,
            cfg,
            shake_timer: Timer::default(),
            shake_intensity: 0.0,
        }
    }

    /// Follow `target` for one tick: center it horizontally, lerp the base
    /// toward it, clamp to world bounds. Vertical follow is fixed at 0.
    pub fn update(&mut self, target: &Aabb, dt: f32) {
        self.shake_timer.tick(dt);

        self.target_x = target.center_x() - self.cfg.screen_width / 2.0;
        self.base_x += (self.target_x - self.base_x) * self.cfg.smoothing;

        let max_x = (self.world_width - self.cfg.screen_width).max(0.0);
        self.base_x = self.base_x.clamp(0.0, max_x);
        self.base_y = 0.0;
    }

    /// (Re)start the shake. `None` falls back to the configured defaults.
    pub fn shake(&mut self, intensity: Option<f32>, duration: Option<f32>) {
        self.shake_intensity = intensity.unwrap_or(self.cfg.shake_intensity);
        self.shake_timer
            .start(duration.unwrap_or(self.cfg.shake_duration));
    }

    pub fn is_shaking(&self) -> bool {
        self.shake_timer.is_active()
    }

    /// Sinusoidal offset whose amplitude decays linearly to zero over the
    /// shake duration. Purely a function of the shake timer, no entropy.
    fn shake_offset(&self) -> (f32, f32) {
        if !self.shake_timer.is_active() {
            return (0.0, 0.0);
        }
        let elapsed = self.shake_timer.duration - self.shake_timer.remaining;
        let falloff = self.shake_timer.remaining / self.shake_timer.duration;
        let amp = self.shake_intensity * falloff;
        (
            (elapsed * SHAKE_FREQ_X).sin() * amp,
            (elapsed * SHAKE_FREQ_Y).cos() * amp,
        )
    }

    /// Observable position: base plus the active shake offset.
    pub fn x(&self) -> f32 {
        self.base_x + self.shake_offset().0
    }

    pub fn y(&self) -> f32 {
        self.base_y + self.shake_offset().1
    }

    /// Base position before shake, the one follow logic operates on.
    pub fn base_x(&self) -> f32 {
        self.base_x
    }

    pub fn world_to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (x - self.x(), y - self.y())
    }

    pub fn screen_to_world(&self, x: f32, y: f32) -> (f32, f32) {
        (x + self.x(), y + self.y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_core::test_helpers::aabb_centered;

    fn camera(world_width: f32) -> Camera {
        Camera::new(world_width, 720.0, CameraConfig::default())
    }

    fn settle(cam: &mut Camera, target: &Aabb) {
        for _ in 0..500 {
            cam.update(target, 1.0 / 60.0);
        }
    }

    #[test]
    fn follows_target_horizontally() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(2000.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        let expected = 2000.0 - 1280.0 / 2.0;
        assert!(
            (cam.x() - expected).abs() < 1.0,
            "camera should settle on the centered target, got {}",
            cam.x()
        );
    }

    #[test]
    fn clamps_to_world_origin() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(10.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        assert_eq!(cam.x(), 0.0, "camera must never go negative");
    }

    #[test]
    fn clamps_to_far_edge() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(5110.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        assert_eq!(cam.x(), 5120.0 - 1280.0);
    }

    #[test]
    fn narrow_world_pins_camera_at_zero() {
        let mut cam = camera(800.0); // narrower than the 1280 screen
        let target = aabb_centered(700.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        assert_eq!(cam.x(), 0.0);
    }

    #[test]
    fn vertical_position_stays_zero() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(2000.0, 650.0, 24.0, 32.0);
        settle(&mut cam, &target);
        assert_eq!(cam.y(), 0.0);
    }

    #[test]
    fn shake_offsets_public_position_only() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(2000.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        let base_before = cam.base_x();

        cam.shake(Some(8.0), Some(0.4));
        cam.update(&target, 0.01);
        assert!(cam.is_shaking());
        assert!(
            (cam.base_x() - base_before).abs() < 1.0,
            "shake must not disturb the smoothed base"
        );
    }

    #[test]
    fn shake_decays_to_nothing() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(2000.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);

        cam.shake(None, None);
        for _ in 0..60 {
            cam.update(&target, 1.0 / 60.0);
        }
        assert!(!cam.is_shaking());
        assert_eq!(cam.y(), 0.0);
    }

    #[test]
    fn shake_amplitude_bounded_by_intensity() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(2000.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        let base = cam.base_x();

        cam.shake(Some(8.0), Some(0.4));
        for _ in 0..24 {
            cam.update(&target, 1.0 / 60.0);
            assert!((cam.x() - base).abs() <= 8.0 + 1.0);
            assert!(cam.y().abs() <= 8.0);
        }
    }

    #[test]
    fn coordinate_transforms_are_inverses() {
        let mut cam = camera(5120.0);
        let target = aabb_centered(2000.0, 300.0, 24.0, 32.0);
        settle(&mut cam, &target);
        cam.shake(None, None);
        cam.update(&target, 0.01);

        let (sx, sy) = cam.world_to_screen(2345.0, 67.0);
        let (wx, wy) = cam.screen_to_world(sx, sy);
        assert!((wx - 2345.0).abs() < 1e-3);
        assert!((wy - 67.0).abs() < 1e-3);
    }
}
