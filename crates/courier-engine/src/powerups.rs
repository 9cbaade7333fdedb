use serde::{Deserialize, Serialize};

/// Collectible power-up kinds. The engine maps these onto the player's
/// activators; timed effects live as timers on the player itself, so a
/// pickup is consumed the moment it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourierPowerUp {
    /// Timed surge: boosted run speed and invulnerability.
    FluxSurge,
    /// Permanent: projectiles fire in pairs (projectiles live outside the core).
    DoubleShot,
    /// Permanent: doubles the stamina pool and its regeneration.
    StaminaBoost,
}
