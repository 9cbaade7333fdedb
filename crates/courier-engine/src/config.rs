use serde::{Deserialize, Serialize};

/// Gravity acceleration (px/s^2, toward the active "down").
pub const GRAVITY: f32 = 1400.0;
/// Horizontal run speed (px/s).
pub const RUN_SPEED: f32 = 180.0;
/// Horizontal speed while Flux Surge is active (px/s).
pub const BOOST_SPEED: f32 = 230.0;
/// Jump impulse (px/s, applied opposite to gravity).
pub const JUMP_IMPULSE: f32 = 520.0;
/// Fall speed cap, same magnitude in both gravity directions (px/s).
pub const MAX_FALL_SPEED: f32 = 600.0;
/// Minimum manual delay between gravity flips (s).
pub const GRAVITY_FLIP_COOLDOWN: f32 = 0.25;
/// Grace window after leaving a surface in which a jump still fires (s).
pub const COYOTE_TIME: f32 = 0.15;
/// Grace window before landing in which a jump press is remembered (s).
pub const JUMP_BUFFER_TIME: f32 = 0.1;
/// Post-hit invulnerability (s).
pub const INVULN_TIME: f32 = 1.5;
/// Starting and maximum hit points.
pub const PLAYER_HP: i32 = 3;
/// Player hit-box size (px).
pub const PLAYER_WIDTH: f32 = 24.0;
pub const PLAYER_HEIGHT: f32 = 32.0;
/// Seconds of airborne time from full base stamina to empty.
pub const STAMINA_MAX_TIME: f32 = 5.0;
/// Base stamina regeneration while grounded (fraction of the pool per second).
pub const STAMINA_REGEN_RATE: f32 = 0.6;
/// Flux Surge duration (s).
pub const FLUX_SURGE_DURATION: f32 = 7.0;
/// Vertical speed above which a ceiling hit reports a bump (px/s).
pub const BUMP_SPEED: f32 = 100.0;
/// Coins per bonus hit point.
pub const COINS_PER_HP_BONUS: u32 = 10;

/// Camera follow lerp factor (lower = smoother).
pub const CAMERA_SMOOTHING: f32 = 0.1;
/// Default shake amplitude (px) and duration (s).
pub const SHAKE_INTENSITY: f32 = 8.0;
pub const SHAKE_DURATION: f32 = 0.4;
/// Screen size the camera frames (px).
pub const SCREEN_WIDTH: f32 = 1280.0;
pub const SCREEN_HEIGHT: f32 = 720.0;

/// Movement tuning, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub run_speed: f32,
    pub boost_speed: f32,
    pub jump_impulse: f32,
    pub max_fall_speed: f32,
    pub flip_cooldown: f32,
    pub coyote_time: f32,
    pub jump_buffer_time: f32,
    pub invuln_time: f32,
    pub player_hp: i32,
    pub player_width: f32,
    pub player_height: f32,
    pub stamina_max_time: f32,
    pub stamina_regen_rate: f32,
    pub flux_surge_duration: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            run_speed: RUN_SPEED,
            boost_speed: BOOST_SPEED,
            jump_impulse: JUMP_IMPULSE,
            max_fall_speed: MAX_FALL_SPEED,
            flip_cooldown: GRAVITY_FLIP_COOLDOWN,
            coyote_time: COYOTE_TIME,
            jump_buffer_time: JUMP_BUFFER_TIME,
            invuln_time: INVULN_TIME,
            player_hp: PLAYER_HP,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            stamina_max_time: STAMINA_MAX_TIME,
            stamina_regen_rate: STAMINA_REGEN_RATE,
            flux_surge_duration: FLUX_SURGE_DURATION,
        }
    }
}

impl PhysicsConfig {
    /// Stamina drained per airborne second. The drain rate is constant;
    /// power-ups grow the pool and the regen rate, never the drain.
    pub fn stamina_drain_rate(&self) -> f32 {
        1.0 / self.stamina_max_time
    }
}

/// Camera tuning, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub smoothing: f32,
    pub shake_intensity: f32,
    pub shake_duration: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            smoothing: CAMERA_SMOOTHING,
            shake_intensity: SHAKE_INTENSITY,
            shake_duration: SHAKE_DURATION,
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
}

impl EngineConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("COURIER_ENGINE_CONFIG")
            .unwrap_or_else(|_| "config/engine.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<EngineConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    EngineConfig::default()
                },
            },
            Err(_) => EngineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_tuning_constants() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.gravity, GRAVITY);
        assert_eq!(cfg.jump_impulse, JUMP_IMPULSE);
        assert_eq!(cfg.coyote_time, COYOTE_TIME);
        assert_eq!(cfg.player_hp, PLAYER_HP);
    }

    #[test]
    fn drain_rate_derived_from_time_to_empty() {
        let cfg = PhysicsConfig::default();
        assert!((cfg.stamina_drain_rate() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: EngineConfig = toml::from_str(
            r#"
            [physics]
            run_speed = 200.0

            [camera]
            smoothing = 0.2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.physics.run_speed, 200.0);
        assert_eq!(cfg.physics.gravity, GRAVITY);
        assert_eq!(cfg.camera.smoothing, 0.2);
        assert_eq!(cfg.camera.screen_width, SCREEN_WIDTH);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let cfg: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }
}
