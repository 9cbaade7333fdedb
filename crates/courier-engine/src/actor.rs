use courier_core::geometry::{Aabb, GravityDir};
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionSystem, resolve_horizontal, resolve_vertical};
use crate::config::{GRAVITY, MAX_FALL_SPEED};
use crate::player::{ContactKind, PlayerController};

/// What a secondary actor can do, chosen at construction time instead of
/// through a subclass hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Integrated under gravity; anchored actors still collide but do not fall.
    pub has_gravity: bool,
    /// Defeated by a direction-consistent stomp.
    pub can_stomp: bool,
    /// Damages the player on any non-stomp contact.
    pub is_hazard: bool,
}

/// Which surface an actor clings to; fixes its personal gravity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    Floor,
    Ceiling,
}

impl Anchor {
    pub fn gravity(&self) -> GravityDir {
        match self {
            Anchor::Floor => GravityDir::Down,
            Anchor::Ceiling => GravityDir::Up,
        }
    }
}

/// A non-controlled actor: enemies, hazards, loose objects. Plain data;
/// behavior lives in free functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub aabb: Aabb,
    pub vel_x: f32,
    pub vel_y: f32,
    pub gravity_dir: GravityDir,
    pub caps: Capabilities,
    pub alive: bool,
}

impl Actor {
    pub fn new(aabb: Aabb, caps: Capabilities, anchor: Anchor) -> Self {
        Self {
            aabb,
            vel_x: 0.0,
            vel_y: 0.0,
            gravity_dir: anchor.gravity(),
            caps,
            alive: true,
        }
    }
}

/// Integrate one actor for a tick: gravity (if it has any), then the same
/// axis-separated push-out the player uses. Velocity zeroes on contact;
/// patrol AI and the like react from outside.
pub fn tick_actor(actor: &mut Actor, collision: &CollisionSystem, dt: f32) {
    if !actor.alive {
        return;
    }

    if actor.caps.has_gravity {
        actor.vel_y += GRAVITY * actor.gravity_dir.sign() * dt;
        match actor.gravity_dir {
            GravityDir::Down => actor.vel_y = actor.vel_y.min(MAX_FALL_SPEED),
            GravityDir::Up => actor.vel_y = actor.vel_y.max(-MAX_FALL_SPEED),
        }
    }

    actor.aabb.x += actor.vel_x * dt;
    let hits = collision.overlaps(&actor.aabb, actor.gravity_dir);
    resolve_horizontal(&mut actor.aabb, &mut actor.vel_x, &hits);

    actor.aabb.y += actor.vel_y * dt;
    let hits = collision.overlaps(&actor.aabb, actor.gravity_dir);
    resolve_vertical(
        &mut actor.aabb,
        &mut actor.vel_y,
        actor.gravity_dir,
        f32::INFINITY,
        &hits,
    );
}

/// Whether the player's current contact with this actor counts as a stomp.
/// Uses the player's box, vertical velocity, and gravity; the actor only
/// needs to be alive and stompable.
pub fn check_stomp(player: &PlayerController, actor: &Actor) -> bool {
    actor.alive
        && actor.caps.can_stomp
        && player.classify_contact(&actor.aabb) == Some(ContactKind::Stomp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{TILE_SIZE, TileKind, TileMap};
    use courier_core::test_helpers::aabb_centered;

    const DT: f32 = 1.0 / 60.0;

    fn floor_sys() -> CollisionSystem {
        let mut map = TileMap::empty(20, 12);
        for col in 0..20 {
            map.set(col, 11, TileKind::Solid);
            map.set(col, 0, TileKind::Solid);
        }
        CollisionSystem::new(map)
    }

    fn grounded_caps() -> Capabilities {
        Capabilities {
            has_gravity: true,
            can_stomp: true,
            is_hazard: true,
        }
    }

    #[test]
    fn falling_actor_settles_on_floor() {
        let sys = floor_sys();
        let mut actor = Actor::new(
            aabb_centered(100.0, 100.0, 40.0, 30.0),
            grounded_caps(),
            Anchor::Floor,
        );
        for _ in 0..600 {
            tick_actor(&mut actor, &sys, DT);
        }
        let floor_top = 11.0 * TILE_SIZE;
        assert!((actor.aabb.bottom() - floor_top).abs() < 1e-3);
        assert_eq!(actor.vel_y, 0.0);
    }

    #[test]
    fn ceiling_actor_falls_upward() {
        let sys = floor_sys();
        let mut actor = Actor::new(
            aabb_centered(100.0, 150.0, 40.0, 30.0),
            grounded_caps(),
            Anchor::Ceiling,
        );
        for _ in 0..600 {
            tick_actor(&mut actor, &sys, DT);
        }
        assert!((actor.aabb.top() - TILE_SIZE).abs() < 1e-3);
    }

    #[test]
    fn gravityless_actor_hovers() {
        let sys = floor_sys();
        let caps = Capabilities {
            has_gravity: false,
            can_stomp: false,
            is_hazard: true,
        };
        let mut actor = Actor::new(aabb_centered(100.0, 150.0, 24.0, 24.0), caps, Anchor::Floor);
        let y0 = actor.aabb.y;
        for _ in 0..60 {
            tick_actor(&mut actor, &sys, DT);
        }
        assert_eq!(actor.aabb.y, y0);
    }

    #[test]
    fn dead_actor_does_not_move() {
        let sys = floor_sys();
        let mut actor = Actor::new(
            aabb_centered(100.0, 100.0, 40.0, 30.0),
            grounded_caps(),
            Anchor::Floor,
        );
        actor.alive = false;
        let before = actor.aabb;
        tick_actor(&mut actor, &sys, DT);
        assert_eq!(actor.aabb, before);
    }

    #[test]
    fn patrol_velocity_zeroes_at_walls() {
        let mut map = TileMap::empty(20, 12);
        for col in 0..20 {
            map.set(col, 11, TileKind::Solid);
        }
        for row in 0..12 {
            map.set(10, row, TileKind::Solid);
        }
        let sys = CollisionSystem::new(map);
        let mut actor = Actor::new(
            aabb_centered(9.0 * TILE_SIZE, 10.0 * TILE_SIZE, 40.0, 30.0),
            grounded_caps(),
            Anchor::Floor,
        );
        actor.vel_x = 120.0;
        for _ in 0..120 {
            tick_actor(&mut actor, &sys, DT);
        }
        assert_eq!(actor.vel_x, 0.0);
        assert!((actor.aabb.right() - 10.0 * TILE_SIZE).abs() < 1e-3);
    }

    #[test]
    fn stomp_check_respects_capabilities() {
        use crate::config::PhysicsConfig;
        use crate::player::InputState;

        let sys = floor_sys();
        let mut player = PlayerController::new(100.0, 200.0, PhysicsConfig::default());
        // A few falling ticks give the player downward velocity.
        for _ in 0..5 {
            player.update(DT, &InputState::default(), &sys);
        }
        let below = player.aabb();
        let target = aabb_centered(
            below.center_x(),
            below.bottom() + 10.0,
            40.0,
            30.0,
        );

        let mut actor = Actor::new(target, grounded_caps(), Anchor::Floor);
        assert!(check_stomp(&player, &actor));

        actor.caps.can_stomp = false;
        assert!(!check_stomp(&player, &actor));

        actor.caps.can_stomp = true;
        actor.alive = false;
        assert!(!check_stomp(&player, &actor));
    }
}
