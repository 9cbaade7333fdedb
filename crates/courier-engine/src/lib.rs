pub mod actor;
pub mod camera;
pub mod collision;
pub mod config;
pub mod player;
pub mod powerups;
pub mod tile;

use courier_core::geometry::Face;
use courier_core::timer::Stopwatch;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, check_stomp, tick_actor};
use crate::camera::Camera;
use crate::collision::CollisionSystem;
use crate::config::EngineConfig;
use crate::player::{DamageOutcome, InputState, PlayerController, PlayerEvent};
use crate::powerups::CourierPowerUp;
use crate::tile::TileMap;

/// Per-tick outcomes the host game maps to sounds, FX, and scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    Jumped,
    Flipped,
    Bump,
    StaminaExhausted,
    /// A hit landed; `critical` mirrors [`DamageOutcome::critical`].
    Damaged { critical: bool },
    PlayerDied,
    StompedActor { index: usize },
    TileBroken { col: u32, row: u32 },
}

/// The whole simulation core for one level: tile grid, controlled player,
/// camera, and secondary actors, advanced by one `update` per frame in a
/// fixed dependency order (input, player, camera, actors).
pub struct Engine {
    collision: CollisionSystem,
    player: PlayerController,
    camera: Camera,
    actors: Vec<Actor>,
    clock: Stopwatch,
    paused: bool,
    pending: InputState,
}

/// Serializable engine state for the external save/checkpoint collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    map: TileMap,
    player: PlayerController,
    actors: Vec<Actor>,
    elapsed: f32,
}

impl Engine {
    /// Build an engine around a finished, already-validated tile grid.
    pub fn new(map: TileMap, cfg: EngineConfig) -> Self {
        let spawn_x = map.spawn_x;
        let spawn_y = map.spawn_y;
        let world_w = map.world_width();
        let world_h = map.world_height();
        let mut clock = Stopwatch::default();
        clock.start();
        Self {
            collision: CollisionSystem::new(map),
            player: PlayerController::new(spawn_x, spawn_y, cfg.physics),
            camera: Camera::new(world_w, world_h, cfg.camera),
            actors: Vec::new(),
            clock,
            paused: false,
            pending: InputState::default(),
        }
    }

    pub fn spawn_actor(&mut self, actor: Actor) -> usize {
        self.actors.push(actor);
        self.actors.len() - 1
    }

    /// Merge one frame of input. Transient presses (jump, flip) accumulate
    /// until the next `update` consumes them, so a press never slips
    /// between frames; the held axis is always overwritten with the latest.
    pub fn queue_input(&mut self, input: &InputState) {
        self.pending.move_dir = input.move_dir;
        if input.jump {
            self.pending.jump = true;
        }
        if input.flip {
            self.pending.flip = true;
        }
    }

    /// Advance the simulation by `dt`. While paused the whole chain is
    /// skipped and nothing mutates.
    pub fn update(&mut self, dt: f32) -> Vec<EngineEvent> {
        if self.paused {
            return Vec::new();
        }
        self.clock.tick(dt);

        let input = std::mem::take(&mut self.pending);
        let mut events: Vec<EngineEvent> = self
            .player
            .update(dt, &input, &self.collision)
            .into_iter()
            .map(|e| match e {
                PlayerEvent::Jumped => EngineEvent::Jumped,
                PlayerEvent::Flipped(_) => EngineEvent::Flipped,
                PlayerEvent::Bump => EngineEvent::Bump,
                PlayerEvent::StaminaExhausted => EngineEvent::StaminaExhausted,
            })
            .collect();

        self.camera.update(&self.player.aabb(), dt);

        for i in 0..self.actors.len() {
            if !self.actors[i].alive {
                continue;
            }
            tick_actor(&mut self.actors[i], &self.collision, dt);

            if check_stomp(&self.player, &self.actors[i]) {
                self.actors[i].alive = false;
                events.push(EngineEvent::StompedActor { index: i });
            } else if self.actors[i].caps.is_hazard
                && self.actors[i].aabb.intersects(&self.player.aabb())
            {
                let outcome = self.damage_player(1);
                if outcome.applied {
                    events.push(EngineEvent::Damaged {
                        critical: outcome.critical,
                    });
                    if outcome.died {
                        events.push(EngineEvent::PlayerDied);
                    }
                }
            }
        }

        events
    }

    /// Apply a hit from an external system (spikes, bullets, boss). The
    /// critical transition triggers the camera shake here, so every caller
    /// gets the same feedback.
    pub fn damage_player(&mut self, amount: i32) -> DamageOutcome {
        let outcome = self.player.take_damage(amount);
        if outcome.critical {
            self.camera.shake(None, None);
        }
        outcome
    }

    /// Apply a collected power-up to the player.
    pub fn apply_power_up(&mut self, kind: CourierPowerUp) {
        match kind {
            CourierPowerUp::FluxSurge => self.player.activate_flux_surge(),
            CourierPowerUp::DoubleShot => self.player.activate_double_shot(),
            CourierPowerUp::StaminaBoost => self.player.activate_stamina_boost(),
        }
    }

    /// Break the tile at a world position when hit from `side`.
    pub fn break_tile_at(&mut self, x: f32, y: f32, side: Face) -> Option<EngineEvent> {
        if self.collision.break_tile_at(x, y, side) {
            // Refused breaks return None above, so the lookup succeeds here.
            let tile = self.collision.tile_at(x, y)?;
            return Some(EngineEvent::TileBroken {
                col: tile.col,
                row: tile.row,
            });
        }
        None
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerController {
        &mut self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn collision(&self) -> &CollisionSystem {
        &self.collision
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Serialize the whole simulation state (grid with broken tiles,
    /// player, actors, clock) for the checkpoint collaborator.
    pub fn snapshot(&self) -> Vec<u8> {
        let snap = Snapshot {
            map: self.collision.map().clone(),
            player: self.player.clone(),
            actors: self.actors.clone(),
            elapsed: self.clock.elapsed(),
        };
        rmp_serde::to_vec(&snap).unwrap_or_default()
    }

    /// Restore a snapshot produced by [`Engine::snapshot`]. Invalid bytes
    /// are ignored; the current state stands.
    pub fn restore(&mut self, data: &[u8]) {
        match rmp_serde::from_slice::<Snapshot>(data) {
            Ok(snap) => {
                self.collision = CollisionSystem::new(snap.map);
                self.player = snap.player;
                self.actors = snap.actors;
                self.clock.elapsed = snap.elapsed;
            },
            Err(e) => {
                tracing::warn!("Failed to decode snapshot: {e}, keeping current state");
            },
        }
    }
}
